/// 経費機能モジュール
///
/// このモジュールは経費一覧クライアントに関連するすべての機能を提供します：
/// - 経費一覧の取得とデータグリッドへの描画
/// - 経費の作成、更新、削除（API Server経由）
/// - 入力フォームのバリデーション
/// - 一覧の絞り込みと週次レポート
// サブモジュールの宣言
pub mod api;
pub mod client;
pub mod confirm;
pub mod forms;
pub mod grid;
pub mod models;
pub mod report;

// 公開インターフェース：外部から使用可能な型と関数をエクスポート
pub use api::{ExpenseApi, HttpExpenseApi};
pub use client::{DeleteOutcome, ExpenseListClient};
pub use confirm::{Confirm, FixedConfirm, StdinConfirm};
pub use forms::{EditForm, NewExpenseForm};
pub use grid::{DataGrid, GridColumn, GridConfig, RowAction, SortDirection};
pub use models::{ExpenseFields, ExpenseFilter, ExpenseInput, ExpenseRecord};
pub use report::WeeklyReport;
