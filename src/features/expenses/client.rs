/// 経費一覧クライアント
///
/// 現在のユーザーの経費データをキャッシュし、データグリッドに描画する。
/// 登録・編集・削除はいずれも成功後に一覧を取得し直して画面を更新する
/// （ローカルのキャッシュを直接書き換えることはない）。
/// 操作の結果は書き込みの成否で決まり、その後の再取得の失敗はログに記録するだけとする。
use crate::features::expenses::api::ExpenseApi;
use crate::features::expenses::confirm::Confirm;
use crate::features::expenses::forms::{EditForm, NewExpenseForm};
use crate::features::expenses::grid::{DataGrid, GridConfig};
use crate::features::expenses::models::{ExpenseFilter, ExpenseRecord};
use crate::features::expenses::report::WeeklyReport;
use crate::shared::errors::{AppError, AppResult};
use log::{error, info};

/// 削除前の確認メッセージ
pub const DELETE_CONFIRM_MESSAGE: &str = "この経費を削除してもよろしいですか？";

/// 削除操作の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// 確認で取り消された
    Declined,
    /// キャッシュに該当する経費がない
    Unknown,
    /// 削除して一覧を更新した
    Deleted,
}

/// 経費一覧クライアント
pub struct ExpenseListClient<A: ExpenseApi, C: Confirm> {
    api: A,
    confirm: C,
    username: String,
    grid_config: GridConfig,
    filter: ExpenseFilter,
    records: Vec<ExpenseRecord>,
    grid: Option<DataGrid>,
    edit_form: EditForm,
    new_expense_form: NewExpenseForm,
}

impl<A: ExpenseApi, C: Confirm> ExpenseListClient<A, C> {
    /// 新しいクライアントを作成する（まだ一覧は取得しない）
    pub fn new(api: A, confirm: C, username: impl Into<String>, grid_config: GridConfig) -> Self {
        Self {
            api,
            confirm,
            username: username.into(),
            grid_config,
            filter: ExpenseFilter::default(),
            records: Vec::new(),
            grid: None,
            edit_form: EditForm::default(),
            new_expense_form: NewExpenseForm::default(),
        }
    }

    /// 一覧を取得してグリッドを描画し直す
    ///
    /// 成功時はキャッシュを丸ごと置き換え、古いグリッドを破棄してから初期化する。
    /// 失敗時はエラーを記録し、キャッシュとグリッドは変更しない。
    pub async fn fetch_and_render(&mut self) -> AppResult<()> {
        let records = match self.api.list_expenses(&self.username, &self.filter).await {
            Ok(records) => records,
            Err(e) => {
                error!("経費一覧の取得に失敗しました: user={}, error={e}", self.username);
                return Err(e);
            }
        };

        if let Some(previous) = self.grid.take() {
            previous.destroy();
        }
        self.grid = Some(DataGrid::initialize(self.grid_config.clone(), &records));
        self.records = records;

        info!("経費一覧を描画しました: count={}", self.records.len());
        Ok(())
    }

    /// 経費を削除する
    ///
    /// # 処理内容
    /// 1. 確認を求め、取り消された場合は何もしない
    /// 2. キャッシュから所有ユーザーを取得し、見つからない場合は何もしない
    /// 3. 削除リクエストを送信し、成功したら一覧を取得し直す
    ///
    /// 削除が成功していれば、再取得に失敗しても`Deleted`を返す
    pub async fn delete(&mut self, id: i64) -> AppResult<DeleteOutcome> {
        if !self.confirm.confirm(DELETE_CONFIRM_MESSAGE) {
            info!("経費削除を取り消しました: expense_id={id}");
            return Ok(DeleteOutcome::Declined);
        }

        let Some(owner) = self.find(id).map(|record| record.user.clone()) else {
            info!("削除対象の経費がキャッシュにありません: expense_id={id}");
            return Ok(DeleteOutcome::Unknown);
        };

        if let Err(e) = self.api.delete_expense(&owner, id).await {
            error!("経費の削除に失敗しました: expense_id={id}, error={e}");
            return Err(e);
        }

        self.refresh_after_write("削除").await;
        Ok(DeleteOutcome::Deleted)
    }

    /// 経費の編集フォームを開く
    ///
    /// キャッシュに該当する経費がない場合は何もせずNoneを返す
    pub fn edit(&mut self, id: i64) -> Option<&mut EditForm> {
        let Some(record) = self.records.iter().find(|record| record.id == id) else {
            info!("編集対象の経費がキャッシュにありません: expense_id={id}");
            return None;
        };

        self.edit_form.populate(record);
        Some(&mut self.edit_form)
    }

    /// 編集フォームを送信する
    ///
    /// フォームが開かれていない場合と金額が空欄の場合はリクエストを送信しない。
    /// 更新に成功したらフォームを閉じてから一覧を取得し直し、失敗時はフォームを開いたままにする。
    pub async fn submit_edit(&mut self) -> AppResult<()> {
        if !self.edit_form.is_visible() {
            return Err(AppError::validation("編集フォームが開かれていません"));
        }

        let fields = match self.edit_form.input.to_fields() {
            Ok(fields) => fields,
            Err(e) => {
                error!("編集内容が不正です: expense_id={}, error={e}", self.edit_form.id);
                return Err(e);
            }
        };

        let (user, id) = (self.edit_form.user.clone(), self.edit_form.id);
        if let Err(e) = self.api.update_expense(&user, id, &fields).await {
            error!("経費の更新に失敗しました: expense_id={id}, error={e}");
            return Err(e);
        }

        self.edit_form.close();
        self.refresh_after_write("更新").await;
        Ok(())
    }

    /// 新規経費フォームを開く
    pub fn open_new_expense_form(&mut self) -> &mut NewExpenseForm {
        self.new_expense_form.open();
        &mut self.new_expense_form
    }

    /// 新規経費フォームを閉じる（入力値は保持する）
    pub fn cancel_new_expense_form(&mut self) {
        self.new_expense_form.hide();
    }

    /// 新規経費フォームを送信する
    ///
    /// フォームが開かれていない場合と金額が空欄の場合はリクエストを送信しない。
    /// 作成に成功したらフォームを隠して入力欄を空にしてから一覧を取得し直す。
    pub async fn submit_new_expense(&mut self) -> AppResult<()> {
        if !self.new_expense_form.is_visible() {
            return Err(AppError::validation("新規経費フォームが開かれていません"));
        }

        let fields = match self.new_expense_form.input.to_fields() {
            Ok(fields) => fields,
            Err(e) => {
                error!("入力内容が不正です: error={e}");
                return Err(e);
            }
        };

        if let Err(e) = self.api.create_expense(&self.username, &fields).await {
            error!("経費の作成に失敗しました: user={}, error={e}", self.username);
            return Err(e);
        }

        self.new_expense_form.hide();
        self.new_expense_form.clear();
        self.refresh_after_write("作成").await;
        Ok(())
    }

    /// 書き込み成功後に一覧を取得し直す
    ///
    /// 書き込みは完了しているため、取得に失敗してもエラーは呼び出し元に返さない
    async fn refresh_after_write(&mut self, operation: &str) {
        if let Err(e) = self.fetch_and_render().await {
            error!("{operation}は完了しましたが、一覧の再取得に失敗しました: error={e}");
        }
    }

    /// 一覧の絞り込み条件を設定する（次回の取得から適用）
    pub fn set_filter(&mut self, filter: ExpenseFilter) {
        self.filter = filter;
    }

    /// キャッシュ中の経費から週次レポートを集計する
    pub fn weekly_report(&self, year: i32, week: u32) -> WeeklyReport {
        WeeklyReport::compute(&self.records, year, week)
    }

    /// キャッシュから経費を検索する
    pub fn find(&self, id: i64) -> Option<&ExpenseRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// キャッシュ中の経費（サーバーの返却順）
    pub fn records(&self) -> &[ExpenseRecord] {
        &self.records
    }

    /// 現在のグリッド（まだ一度も取得していない場合はNone）
    pub fn grid(&self) -> Option<&DataGrid> {
        self.grid.as_ref()
    }

    pub fn edit_form(&self) -> &EditForm {
        &self.edit_form
    }

    pub fn new_expense_form(&self) -> &NewExpenseForm {
        &self.new_expense_form
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::expenses::confirm::FixedConfirm;
    use crate::features::expenses::models::ExpenseFields;
    use async_trait::async_trait;
    use chrono::{NaiveDate, NaiveTime};
    use rust_decimal::Decimal;
    use std::sync::{Arc, Mutex};

    /// 記録用のAPI呼び出し
    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        List(String),
        Create(String, ExpenseFields),
        Update(String, i64, ExpenseFields),
        Delete(String, i64),
    }

    /// メモリ上の経費API（呼び出しを記録する）
    #[derive(Clone, Default)]
    struct FakeApi {
        records: Arc<Mutex<Vec<ExpenseRecord>>>,
        calls: Arc<Mutex<Vec<Call>>>,
        fail_list: Arc<Mutex<bool>>,
        fail_writes: Arc<Mutex<bool>>,
        next_id: Arc<Mutex<i64>>,
    }

    impl FakeApi {
        fn with_records(records: Vec<ExpenseRecord>) -> Self {
            let next_id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
            let api = Self::default();
            *api.records.lock().unwrap() = records;
            *api.next_id.lock().unwrap() = next_id;
            api
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn list_count(&self) -> usize {
            self.calls()
                .iter()
                .filter(|call| matches!(call, Call::List(_)))
                .count()
        }

        fn write_error() -> AppError {
            AppError::api(500, "サーバー内部エラーが発生しました")
        }
    }

    #[async_trait]
    impl ExpenseApi for FakeApi {
        async fn list_expenses(
            &self,
            user: &str,
            _filter: &ExpenseFilter,
        ) -> AppResult<Vec<ExpenseRecord>> {
            self.calls.lock().unwrap().push(Call::List(user.to_string()));
            if *self.fail_list.lock().unwrap() {
                return Err(AppError::ExternalService("接続失敗".to_string()));
            }
            Ok(self.records.lock().unwrap().clone())
        }

        async fn create_expense(&self, user: &str, fields: &ExpenseFields) -> AppResult<()> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Create(user.to_string(), fields.clone()));
            if *self.fail_writes.lock().unwrap() {
                return Err(Self::write_error());
            }
            let mut next_id = self.next_id.lock().unwrap();
            self.records.lock().unwrap().push(ExpenseRecord {
                id: *next_id,
                user: user.to_string(),
                date: fields.date.unwrap_or_else(|| NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()),
                time: fields.time.unwrap_or_else(|| NaiveTime::from_hms_opt(0, 0, 0).unwrap()),
                amount: fields.amount,
                description: Some(fields.description.clone()),
                comment: Some(fields.comment.clone()),
            });
            *next_id += 1;
            Ok(())
        }

        async fn update_expense(
            &self,
            user: &str,
            id: i64,
            fields: &ExpenseFields,
        ) -> AppResult<()> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Update(user.to_string(), id, fields.clone()));
            if *self.fail_writes.lock().unwrap() {
                return Err(Self::write_error());
            }
            let mut records = self.records.lock().unwrap();
            let record = records
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| AppError::api(404, "Not found."))?;
            record.amount = fields.amount;
            record.description = Some(fields.description.clone());
            record.comment = Some(fields.comment.clone());
            // 送信されなかった日付・時刻は現在の値のまま
            if let Some(date) = fields.date {
                record.date = date;
            }
            if let Some(time) = fields.time {
                record.time = time;
            }
            Ok(())
        }

        async fn delete_expense(&self, user: &str, id: i64) -> AppResult<()> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Delete(user.to_string(), id));
            if *self.fail_writes.lock().unwrap() {
                return Err(Self::write_error());
            }
            self.records.lock().unwrap().retain(|r| r.id != id);
            Ok(())
        }
    }

    fn create_record(id: i64, user: &str, date: (i32, u32, u32)) -> ExpenseRecord {
        ExpenseRecord {
            id,
            user: user.to_string(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            amount: Decimal::new(1000, 2),
            description: Some(format!("経費{id}")),
            comment: None,
        }
    }

    fn create_test_client(
        api: FakeApi,
        answer: bool,
    ) -> ExpenseListClient<FakeApi, FixedConfirm> {
        ExpenseListClient::new(api, FixedConfirm(answer), "sasa", GridConfig::default())
    }

    #[tokio::test]
    async fn test_fetch_and_render_sorts_rows() {
        let api = FakeApi::with_records(vec![
            create_record(1, "sasa", (2020, 1, 2)),
            create_record(2, "sasa", (2020, 1, 1)),
        ]);
        let mut client = create_test_client(api.clone(), true);

        client.fetch_and_render().await.unwrap();

        assert_eq!(client.grid().unwrap().row_ids(), vec![2, 1]);
        // キャッシュはサーバーの返却順のまま
        assert_eq!(client.records()[0].id, 1);
        assert_eq!(api.calls(), vec![Call::List("sasa".to_string())]);
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_previous_state() {
        let api = FakeApi::with_records(vec![create_record(1, "sasa", (2020, 1, 1))]);
        let mut client = create_test_client(api.clone(), true);
        client.fetch_and_render().await.unwrap();

        *api.fail_list.lock().unwrap() = true;
        api.records.lock().unwrap().clear();

        assert!(client.fetch_and_render().await.is_err());
        assert_eq!(client.records().len(), 1);
        assert_eq!(client.grid().unwrap().row_ids(), vec![1]);
    }

    #[tokio::test]
    async fn test_delete_unknown_id_sends_no_request() {
        let api = FakeApi::with_records(vec![create_record(1, "sasa", (2020, 1, 1))]);
        let mut client = create_test_client(api.clone(), true);
        client.fetch_and_render().await.unwrap();

        let outcome = client.delete(99).await.unwrap();

        assert_eq!(outcome, DeleteOutcome::Unknown);
        assert_eq!(api.calls(), vec![Call::List("sasa".to_string())]);
    }

    #[tokio::test]
    async fn test_delete_declined_sends_no_request() {
        let api = FakeApi::with_records(vec![create_record(1, "sasa", (2020, 1, 1))]);
        let mut client = create_test_client(api.clone(), false);
        client.fetch_and_render().await.unwrap();

        let outcome = client.delete(1).await.unwrap();

        assert_eq!(outcome, DeleteOutcome::Declined);
        assert_eq!(api.calls().len(), 1);
        assert_eq!(client.records().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_uses_record_owner_and_refetches_once() {
        let api = FakeApi::with_records(vec![
            create_record(1, "sasa", (2020, 1, 1)),
            create_record(2, "other", (2020, 1, 2)),
        ]);
        let mut client = create_test_client(api.clone(), true);
        client.fetch_and_render().await.unwrap();

        let outcome = client.delete(2).await.unwrap();

        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert_eq!(
            api.calls(),
            vec![
                Call::List("sasa".to_string()),
                Call::Delete("other".to_string(), 2),
                Call::List("sasa".to_string()),
            ]
        );
        assert_eq!(client.grid().unwrap().row_ids(), vec![1]);
    }

    #[tokio::test]
    async fn test_delete_failure_does_not_refetch() {
        let api = FakeApi::with_records(vec![create_record(1, "sasa", (2020, 1, 1))]);
        let mut client = create_test_client(api.clone(), true);
        client.fetch_and_render().await.unwrap();
        *api.fail_writes.lock().unwrap() = true;

        assert!(client.delete(1).await.is_err());
        assert_eq!(api.list_count(), 1);
        assert_eq!(client.records().len(), 1);
    }

    #[tokio::test]
    async fn test_edit_unknown_id_is_noop() {
        let api = FakeApi::with_records(vec![create_record(1, "sasa", (2020, 1, 1))]);
        let mut client = create_test_client(api.clone(), true);
        client.fetch_and_render().await.unwrap();

        assert!(client.edit(42).is_none());
        assert!(!client.edit_form().is_visible());
    }

    #[tokio::test]
    async fn test_submit_edit_with_empty_amount_sends_no_request() {
        let api = FakeApi::with_records(vec![create_record(1, "sasa", (2020, 1, 1))]);
        let mut client = create_test_client(api.clone(), true);
        client.fetch_and_render().await.unwrap();

        let form = client.edit(1).unwrap();
        form.input.amount = "  ".to_string();

        let result = client.submit_edit().await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(api.calls().len(), 1);
        assert!(client.edit_form().is_visible());
    }

    #[tokio::test]
    async fn test_submit_edit_updates_and_refetches_once() {
        let api = FakeApi::with_records(vec![create_record(1, "sasa", (2020, 1, 1))]);
        let mut client = create_test_client(api.clone(), true);
        client.fetch_and_render().await.unwrap();

        let form = client.edit(1).unwrap();
        assert_eq!(form.input.amount, "10.00");
        form.input.amount = "25.5".to_string();
        form.input.comment = "修正".to_string();

        client.submit_edit().await.unwrap();

        let calls = api.calls();
        assert_eq!(calls.len(), 3);
        assert!(matches!(&calls[1], Call::Update(user, 1, fields)
            if user == "sasa" && fields.amount == Decimal::new(255, 1)));
        assert_eq!(calls[2], Call::List("sasa".to_string()));
        assert_eq!(client.find(1).unwrap().comment.as_deref(), Some("修正"));
        assert!(!client.edit_form().is_visible());
    }

    #[tokio::test]
    async fn test_submit_edit_failure_keeps_form_open() {
        let api = FakeApi::with_records(vec![create_record(1, "sasa", (2020, 1, 1))]);
        let mut client = create_test_client(api.clone(), true);
        client.fetch_and_render().await.unwrap();
        *api.fail_writes.lock().unwrap() = true;

        client.edit(1).unwrap();
        assert!(client.submit_edit().await.is_err());

        assert!(client.edit_form().is_visible());
        assert_eq!(api.list_count(), 1);
    }

    #[tokio::test]
    async fn test_create_with_empty_amount_sends_no_request() {
        let api = FakeApi::default();
        let mut client = create_test_client(api.clone(), true);

        let form = client.open_new_expense_form();
        form.input.description = "昼食".to_string();

        let result = client.submit_new_expense().await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(api.calls().is_empty());
        assert!(client.new_expense_form().is_visible());
    }

    #[tokio::test]
    async fn test_create_posts_description_and_clears_form() {
        let api = FakeApi::with_records(vec![create_record(1, "sasa", (2020, 1, 5))]);
        let mut client = create_test_client(api.clone(), true);
        client.fetch_and_render().await.unwrap();

        let form = client.open_new_expense_form();
        form.input.amount = "7".to_string();
        form.input.date = "2020-01-03".to_string();
        form.input.description = "コーヒー".to_string();

        client.submit_new_expense().await.unwrap();

        let calls = api.calls();
        assert_eq!(calls.len(), 3);
        match &calls[1] {
            Call::Create(user, fields) => {
                assert_eq!(user, "sasa");
                assert_eq!(fields.amount, Decimal::from(7));
                assert_eq!(fields.description, "コーヒー");
            }
            other => panic!("unexpected call: {other:?}"),
        }
        assert_eq!(calls[2], Call::List("sasa".to_string()));

        assert_eq!(client.grid().unwrap().row_ids(), vec![2, 1]);
        assert!(!client.new_expense_form().is_visible());
        assert!(client.new_expense_form().is_add_button_visible());
        assert_eq!(client.new_expense_form().input.amount, "");
    }

    #[tokio::test]
    async fn test_create_failure_keeps_inputs() {
        let api = FakeApi::default();
        *api.fail_writes.lock().unwrap() = true;
        let mut client = create_test_client(api.clone(), true);

        client.open_new_expense_form().input.amount = "3".to_string();
        assert!(client.submit_new_expense().await.is_err());

        assert!(client.new_expense_form().is_visible());
        assert_eq!(client.new_expense_form().input.amount, "3");
        assert_eq!(api.list_count(), 0);
    }

    #[tokio::test]
    async fn test_cancel_new_expense_form() {
        let mut client = create_test_client(FakeApi::default(), true);
        client.open_new_expense_form();
        client.cancel_new_expense_form();
        assert!(client.new_expense_form().is_add_button_visible());
    }

    #[tokio::test]
    async fn test_submit_edit_can_clear_comment() {
        let mut record = create_record(1, "sasa", (2020, 1, 1));
        record.comment = Some("打ち合わせ".to_string());
        let api = FakeApi::with_records(vec![record]);
        let mut client = create_test_client(api.clone(), true);
        client.fetch_and_render().await.unwrap();

        let form = client.edit(1).unwrap();
        assert_eq!(form.input.comment, "打ち合わせ");
        form.input.comment.clear();

        client.submit_edit().await.unwrap();

        match &api.calls()[1] {
            Call::Update(_, 1, fields) => {
                assert_eq!(fields.comment, "");
                assert!(fields
                    .to_form_pairs()
                    .contains(&("comment".to_string(), "".to_string())));
            }
            other => panic!("unexpected call: {other:?}"),
        }
        assert_eq!(client.find(1).unwrap().comment.as_deref(), Some(""));
        assert_eq!(client.find(1).unwrap().description.as_deref(), Some("経費1"));
    }

    #[tokio::test]
    async fn test_submit_edit_without_open_form_sends_no_request() {
        let api = FakeApi::with_records(vec![create_record(1, "sasa", (2020, 1, 1))]);
        let mut client = create_test_client(api.clone(), true);
        client.fetch_and_render().await.unwrap();

        let result = client.submit_edit().await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(api.calls(), vec![Call::List("sasa".to_string())]);
    }

    #[tokio::test]
    async fn test_submit_edit_twice_sends_one_update() {
        let api = FakeApi::with_records(vec![create_record(1, "sasa", (2020, 1, 1))]);
        let mut client = create_test_client(api.clone(), true);
        client.fetch_and_render().await.unwrap();

        client.edit(1).unwrap().input.amount = "12".to_string();
        client.submit_edit().await.unwrap();
        assert!(client.submit_edit().await.is_err());

        let updates = api
            .calls()
            .iter()
            .filter(|call| matches!(call, Call::Update(..)))
            .count();
        assert_eq!(updates, 1);
    }

    #[tokio::test]
    async fn test_submit_new_expense_without_open_form_sends_no_request() {
        let api = FakeApi::default();
        let mut client = create_test_client(api.clone(), true);

        client.open_new_expense_form().input.amount = "5".to_string();
        client.cancel_new_expense_form();

        let result = client.submit_new_expense().await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(api.calls().is_empty());
        assert_eq!(client.new_expense_form().input.amount, "5");
    }

    #[tokio::test]
    async fn test_create_succeeds_when_refetch_fails() {
        let api = FakeApi::with_records(vec![create_record(1, "sasa", (2020, 1, 1))]);
        let mut client = create_test_client(api.clone(), true);
        client.fetch_and_render().await.unwrap();
        *api.fail_list.lock().unwrap() = true;

        client.open_new_expense_form().input.amount = "5".to_string();
        client.submit_new_expense().await.unwrap();

        assert_eq!(api.records.lock().unwrap().len(), 2);
        assert_eq!(api.list_count(), 2);
        assert!(!client.new_expense_form().is_visible());
        assert_eq!(client.new_expense_form().input.amount, "");
        // 再取得に失敗したため表示は前回のまま
        assert_eq!(client.grid().unwrap().row_ids(), vec![1]);
    }

    #[tokio::test]
    async fn test_edit_and_delete_succeed_when_refetch_fails() {
        let api = FakeApi::with_records(vec![
            create_record(1, "sasa", (2020, 1, 1)),
            create_record(2, "sasa", (2020, 1, 2)),
        ]);
        let mut client = create_test_client(api.clone(), true);
        client.fetch_and_render().await.unwrap();
        *api.fail_list.lock().unwrap() = true;

        client.edit(1).unwrap().input.amount = "30".to_string();
        client.submit_edit().await.unwrap();
        assert!(!client.edit_form().is_visible());

        let outcome = client.delete(2).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted);

        let server = api.records.lock().unwrap().clone();
        assert_eq!(server.len(), 1);
        assert_eq!(server[0].amount, Decimal::from(30));
        assert_eq!(api.list_count(), 3);
    }

    #[tokio::test]
    async fn test_weekly_report_uses_cache() {
        let api = FakeApi::with_records(vec![
            create_record(1, "sasa", (2020, 1, 6)),
            create_record(2, "sasa", (2020, 1, 7)),
        ]);
        let mut client = create_test_client(api, true);
        client.fetch_and_render().await.unwrap();

        let report = client.weekly_report(2020, 2);
        assert_eq!(report.count, 2);
        assert_eq!(report.total, Some(Decimal::new(2000, 2)));
    }
}
