// 機能モジュール構造
pub mod cli;
pub mod features;
pub mod shared;

use shared::config::environment::{initialize_logging_system, load_environment_variables};
use shared::errors::AppResult;

/// アプリケーションを起動する
///
/// # 処理内容
/// 1. .envファイルの読み込み（開発環境のみ）
/// 2. ログシステムの初期化
/// 3. コマンドの実行
pub async fn run(args: cli::Args) -> AppResult<()> {
    load_environment_variables();
    initialize_logging_system();

    log::info!("経費一覧クライアントを起動します: command={:?}", args.command);
    cli::run(args).await
}
