/// 汎用APIクライアント
///
/// 経費APIサーバーとの通信を行うクライアント。
/// 全リクエストに`Authorization: Token <token>`を付与し、
/// 書き込み系リクエストには`X-CSRFToken`ヘッダーとフォームの`csrftoken`を付与する。
use crate::shared::config::ApiConfig;
use crate::shared::errors::{AppError, AppResult};
use log::{debug, info, warn};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// CSRFトークンのヘッダー名
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// フォームのキーと値の組
pub type FormPairs = Vec<(String, String)>;

/// APIクライアント設定
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub max_retries: u32,
}

impl From<ApiConfig> for ApiClientConfig {
    fn from(api_config: ApiConfig) -> Self {
        Self {
            base_url: api_config.base_url,
            timeout_seconds: api_config.timeout_seconds,
            max_retries: api_config.max_retries,
        }
    }
}

/// APIサーバーからのエラーレスポンス（`{"detail": "..."}`形式）
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// 書き込みリクエストの認証情報
#[derive(Debug, Clone, Copy)]
pub struct WriteAuth<'a> {
    /// Authorizationヘッダーの値
    pub authorization: &'a str,
    /// CSRFトークン
    pub csrf_token: &'a str,
}

/// 汎用APIクライアント
pub struct ApiClient {
    client: Client,
    config: ApiClientConfig,
}

impl ApiClient {
    /// 設定を指定してAPIクライアントを作成
    pub fn new_with_config(config: ApiClientConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::configuration(format!("HTTPクライアント初期化失敗: {e}")))?;

        Ok(Self { client, config })
    }

    /// エンドポイントとクエリパラメータから完全なURLを組み立てる
    pub fn build_url(&self, endpoint: &str, query: &[(String, String)]) -> AppResult<Url> {
        let raw = format!("{}{endpoint}", self.config.base_url.trim_end_matches('/'));
        let mut url = Url::parse(&raw)
            .map_err(|e| AppError::configuration(format!("URLの組み立てに失敗しました: {raw}: {e}")))?;

        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }

        Ok(url)
    }

    /// GETリクエストを組み立てる（送信はしない）
    pub fn build_get(
        &self,
        endpoint: &str,
        query: &[(String, String)],
        authorization: &str,
    ) -> AppResult<RequestBuilder> {
        let url = self.build_url(endpoint, query)?;
        Ok(self
            .client
            .get(url)
            .header(AUTHORIZATION, authorization))
    }

    /// フォーム付きの書き込みリクエストを組み立てる（送信はしない）
    ///
    /// フォームの末尾に`csrftoken`を追加し、同じ値を`X-CSRFToken`ヘッダーにも設定する
    pub fn build_form(
        &self,
        method: Method,
        endpoint: &str,
        form: &[(String, String)],
        auth: WriteAuth<'_>,
    ) -> AppResult<RequestBuilder> {
        let url = self.build_url(endpoint, &[])?;

        let mut body: FormPairs = form.to_vec();
        body.push(("csrftoken".to_string(), auth.csrf_token.to_string()));

        Ok(self
            .client
            .request(method, url)
            .header(AUTHORIZATION, auth.authorization)
            .header(CSRF_HEADER, auth.csrf_token)
            .form(&body))
    }

    /// GETリクエストを送信
    pub async fn get<T>(
        &self,
        endpoint: &str,
        query: &[(String, String)],
        authorization: &str,
    ) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        info!("GETリクエスト送信: endpoint={endpoint}");

        let request = self.build_get(endpoint, query, authorization)?;
        let response = self.send_request_with_retry(request, "GET", endpoint).await?;
        Self::parse_json(response, "GET", endpoint).await
    }

    /// フォーム付きPOSTリクエストを送信
    pub async fn post_form<T>(
        &self,
        endpoint: &str,
        form: &[(String, String)],
        auth: WriteAuth<'_>,
    ) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        info!("POSTリクエスト送信: endpoint={endpoint}");

        let request = self.build_form(Method::POST, endpoint, form, auth)?;
        let response = self.send_request_with_retry(request, "POST", endpoint).await?;
        Self::parse_json(response, "POST", endpoint).await
    }

    /// フォーム付きPUTリクエストを送信
    pub async fn put_form<T>(
        &self,
        endpoint: &str,
        form: &[(String, String)],
        auth: WriteAuth<'_>,
    ) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        info!("PUTリクエスト送信: endpoint={endpoint}");

        let request = self.build_form(Method::PUT, endpoint, form, auth)?;
        let response = self.send_request_with_retry(request, "PUT", endpoint).await?;
        Self::parse_json(response, "PUT", endpoint).await
    }

    /// フォーム付きDELETEリクエストを送信
    ///
    /// DELETEは通常レスポンスボディがないため、成功ステータスのみチェックする
    pub async fn delete_form(
        &self,
        endpoint: &str,
        form: &[(String, String)],
        auth: WriteAuth<'_>,
    ) -> AppResult<()> {
        info!("DELETEリクエスト送信: endpoint={endpoint}");

        let request = self.build_form(Method::DELETE, endpoint, form, auth)?;
        self.send_request_with_retry(request, "DELETE", endpoint)
            .await?;

        info!("DELETEリクエスト成功: endpoint={endpoint}");
        Ok(())
    }

    /// 成功レスポンスのボディをJSONとして解析する
    async fn parse_json<T>(response: Response, method: &str, endpoint: &str) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        let result: T = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("レスポンス解析エラー: {e}")))?;

        info!("{method}リクエスト成功: endpoint={endpoint}");
        Ok(result)
    }

    /// リトライ機能付きでリクエストを送信し、成功レスポンスを返す
    ///
    /// 接続エラーのみ`max_retries`回までリトライする。
    /// 2xx以外のレスポンスはリトライせずにエラーとして返す。
    async fn send_request_with_retry(
        &self,
        request: RequestBuilder,
        method: &str,
        endpoint: &str,
    ) -> AppResult<Response> {
        let mut attempts = 0;
        loop {
            let cloned_request = request.try_clone().ok_or_else(|| {
                AppError::ExternalService("リクエストのクローンに失敗しました".to_string())
            })?;

            match cloned_request.send().await {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) => {
                    let error = Self::handle_error_response(response).await;
                    warn!("{method}リクエスト失敗: endpoint={endpoint}, error={error}");
                    return Err(error);
                }
                Err(e) if attempts < self.config.max_retries => {
                    attempts += 1;
                    let delay = Duration::from_secs(2_u64.pow(attempts));
                    warn!(
                        "APIリクエスト失敗、リトライします: attempt={attempts}/{}, delay={delay:?}, error={e}",
                        self.config.max_retries
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    return Err(AppError::ExternalService(format!(
                        "APIサーバーへの接続に失敗しました: {e}"
                    )));
                }
            }
        }
    }

    /// エラーレスポンスをAppErrorに変換する
    async fn handle_error_response(response: Response) -> AppError {
        let status_code = response.status().as_u16();

        let response_text = response
            .text()
            .await
            .unwrap_or_else(|_| "レスポンス読み取り失敗".to_string());

        error_from_body(status_code, &response_text)
    }
}

/// ステータスコードとレスポンスボディからAppErrorを作成する
///
/// `{"detail": "..."}`形式のボディであればその内容を、
/// それ以外の場合はステータスコードに応じた汎用メッセージを使用する
pub fn error_from_body(status_code: u16, response_text: &str) -> AppError {
    if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(response_text) {
        debug!(
            "APIサーバーから構造化エラーレスポンスを受信: status={status_code}, detail={}",
            error_response.detail
        );
        return AppError::api(status_code, error_response.detail);
    }

    let user_message = match status_code {
        400 => "リクエストの形式が正しくありません",
        401 => "認証に失敗しました。トークンを確認してください",
        403 => "この操作を実行する権限がありません",
        404 => "指定されたリソースが見つかりません",
        405 => "許可されていないメソッドです",
        429 => "リクエストが多すぎます。しばらく待ってから再試行してください",
        500 => "サーバー内部エラーが発生しました",
        502 => "APIサーバーとの通信でエラーが発生しました",
        503 => "APIサーバーが一時的に利用できません",
        504 => "APIサーバーからの応答がタイムアウトしました",
        _ => "不明なエラーが発生しました",
    };

    warn!("APIサーバーから非構造化エラーレスポンス: status={status_code}, body={response_text}");

    AppError::api(status_code, user_message)
}
