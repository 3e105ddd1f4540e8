/// 設定モジュール
///
/// 環境変数・.envファイルからの設定読み込みとログ初期化を提供します
pub mod environment;

pub use environment::{
    initialize_logging_system, load_environment_variables, ApiConfig, DisplayConfig,
    SessionConfig,
};
