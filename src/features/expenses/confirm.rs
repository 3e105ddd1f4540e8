use std::io::{BufRead, Write};

/// 削除前の確認ダイアログ
pub trait Confirm: Send + Sync {
    /// メッセージを表示して確認を求める（承認された場合はtrue）
    fn confirm(&self, message: &str) -> bool;
}

/// 標準入力で確認を求める
#[derive(Debug, Default)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, message: &str) -> bool {
        print!("{message} [y/N]: ");
        if let Err(e) = std::io::stdout().flush() {
            log::warn!("標準出力のフラッシュに失敗しました: {e}");
        }

        let mut answer = String::new();
        match std::io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(e) => {
                log::error!("確認入力の読み込みに失敗しました: {e}");
                false
            }
        }
    }
}

/// 常に同じ回答を返す（`--yes`指定時など）
#[derive(Debug, Clone, Copy)]
pub struct FixedConfirm(pub bool);

impl Confirm for FixedConfirm {
    fn confirm(&self, message: &str) -> bool {
        log::debug!("確認を自動応答しました: message={message}, answer={}", self.0);
        self.0
    }
}

/// 入力が承認（y / yes）かどうか
fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
