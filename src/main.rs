use clap::Parser;
use expense_list_client_lib::cli::Args;
use expense_list_client_lib::shared::errors::ErrorSeverity;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match expense_list_client_lib::run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // 入力ミスや権限不足などは警告として記録する
            match e.severity() {
                ErrorSeverity::Low => log::warn!("コマンドの実行に失敗しました: {}", e.details()),
                ErrorSeverity::Medium | ErrorSeverity::High => {
                    log::error!("コマンドの実行に失敗しました: {}", e.details())
                }
            }
            eprintln!("エラー: {}", e.user_message());
            ExitCode::FAILURE
        }
    }
}
