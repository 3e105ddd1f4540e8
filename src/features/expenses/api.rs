/// API Server経由での経費操作
///
/// `ExpenseApi`は経費一覧クライアントとAPIサーバーの境界。
/// 本番では`HttpExpenseApi`、テストではメモリ上の実装を使う。
use crate::features::expenses::models::{ExpenseFields, ExpenseFilter, ExpenseRecord};
use crate::shared::api_client::{ApiClient, WriteAuth};
use crate::shared::errors::AppResult;
use crate::shared::session::PageSession;
use async_trait::async_trait;
use log::info;
use std::sync::Arc;

/// 経費APIの操作
#[async_trait]
pub trait ExpenseApi: Send + Sync {
    /// 指定ユーザーの経費一覧を取得する
    async fn list_expenses(
        &self,
        user: &str,
        filter: &ExpenseFilter,
    ) -> AppResult<Vec<ExpenseRecord>>;

    /// 経費を作成する
    async fn create_expense(&self, user: &str, fields: &ExpenseFields) -> AppResult<()>;

    /// 経費を更新する
    async fn update_expense(&self, user: &str, id: i64, fields: &ExpenseFields) -> AppResult<()>;

    /// 経費を削除する
    async fn delete_expense(&self, user: &str, id: i64) -> AppResult<()>;
}

/// 経費一覧・作成のエンドポイント
pub fn collection_endpoint(user: &str) -> String {
    format!("/api/users/{}/expenses/", urlencoding::encode(user))
}

/// 経費1件（更新・削除）のエンドポイント
pub fn detail_endpoint(user: &str, id: i64) -> String {
    format!("/api/users/{}/expenses/{id}", urlencoding::encode(user))
}

/// HTTP経由の経費API
pub struct HttpExpenseApi {
    client: ApiClient,
    session: Arc<PageSession>,
}

impl HttpExpenseApi {
    pub fn new(client: ApiClient, session: Arc<PageSession>) -> Self {
        Self { client, session }
    }

    /// 書き込みリクエストの認証情報を組み立てる
    ///
    /// CSRFトークンはリクエストのたびにCookieから読み直す
    fn write_credentials(&self) -> AppResult<(String, String)> {
        Ok((
            self.session.authorization_header(),
            self.session.csrf_token()?,
        ))
    }

    /// 更新リクエストのフォーム（フィールド + `id`）
    fn update_form(id: i64, fields: &ExpenseFields) -> Vec<(String, String)> {
        let mut form = vec![("id".to_string(), id.to_string())];
        form.extend(fields.to_form_pairs());
        form
    }

    /// 書き込みリクエストを組み立てる（送信はしない）
    pub fn build_write_request(
        &self,
        method: reqwest::Method,
        endpoint: &str,
        form: &[(String, String)],
    ) -> AppResult<reqwest::RequestBuilder> {
        let (authorization, csrf_token) = self.write_credentials()?;
        self.client.build_form(
            method,
            endpoint,
            form,
            WriteAuth {
                authorization: &authorization,
                csrf_token: &csrf_token,
            },
        )
    }
}

#[async_trait]
impl ExpenseApi for HttpExpenseApi {
    async fn list_expenses(
        &self,
        user: &str,
        filter: &ExpenseFilter,
    ) -> AppResult<Vec<ExpenseRecord>> {
        let endpoint = collection_endpoint(user);
        let expenses: Vec<ExpenseRecord> = self
            .client
            .get(
                &endpoint,
                &filter.to_query(),
                &self.session.authorization_header(),
            )
            .await?;

        info!("経費一覧取得成功: user={user}, count={}", expenses.len());
        Ok(expenses)
    }

    async fn create_expense(&self, user: &str, fields: &ExpenseFields) -> AppResult<()> {
        let endpoint = collection_endpoint(user);
        let (authorization, csrf_token) = self.write_credentials()?;
        let created: serde_json::Value = self
            .client
            .post_form(
                &endpoint,
                &fields.to_form_pairs(),
                WriteAuth {
                    authorization: &authorization,
                    csrf_token: &csrf_token,
                },
            )
            .await?;

        info!("経費作成成功: user={user}, response={created}");
        Ok(())
    }

    async fn update_expense(&self, user: &str, id: i64, fields: &ExpenseFields) -> AppResult<()> {
        let endpoint = detail_endpoint(user, id);
        let (authorization, csrf_token) = self.write_credentials()?;
        let _updated: serde_json::Value = self
            .client
            .put_form(
                &endpoint,
                &Self::update_form(id, fields),
                WriteAuth {
                    authorization: &authorization,
                    csrf_token: &csrf_token,
                },
            )
            .await?;

        info!("経費更新成功: user={user}, expense_id={id}");
        Ok(())
    }

    async fn delete_expense(&self, user: &str, id: i64) -> AppResult<()> {
        let endpoint = detail_endpoint(user, id);
        let (authorization, csrf_token) = self.write_credentials()?;
        self.client
            .delete_form(
                &endpoint,
                &[],
                WriteAuth {
                    authorization: &authorization,
                    csrf_token: &csrf_token,
                },
            )
            .await?;

        info!("経費削除成功: user={user}, expense_id={id}");
        Ok(())
    }
}
