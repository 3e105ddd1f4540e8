use crate::features::expenses::models::{ExpenseInput, ExpenseRecord};

/// 経費編集フォーム
///
/// 編集対象の経費の所有ユーザーとIDを保持し、送信先URLの組み立てに使う
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditForm {
    pub user: String,
    pub id: i64,
    pub input: ExpenseInput,
    visible: bool,
}

impl EditForm {
    /// 経費データの現在値でフォームを埋めて開く
    pub fn populate(&mut self, record: &ExpenseRecord) {
        self.user = record.user.clone();
        self.id = record.id;
        self.input = ExpenseInput::from_record(record);
        self.visible = true;
    }

    /// フォームを閉じる
    pub fn close(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

/// 新規経費フォーム
///
/// 表示中は「経費を追加」ボタンが隠れる
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewExpenseForm {
    pub input: ExpenseInput,
    visible: bool,
}

impl NewExpenseForm {
    /// フォームを表示する
    pub fn open(&mut self) {
        self.visible = true;
    }

    /// フォームを隠す（入力値は保持する）
    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// 入力欄を空にする
    pub fn clear(&mut self) {
        self.input.clear();
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// 「経費を追加」ボタンが表示されているか
    pub fn is_add_button_visible(&self) -> bool {
        !self.visible
    }
}
