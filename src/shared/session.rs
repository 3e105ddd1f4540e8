/// ページセッション
///
/// ホスト側（CLI）が事前に用意するユーザー名・認証トークン・Cookieを保持します。
/// CSRFトークンはリクエストのたびにCookieから読み直します。
use crate::shared::config::SessionConfig;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::cookies::CookieSource;

/// CSRFトークンを格納するCookie名
pub const CSRF_COOKIE_NAME: &str = "csrftoken";

/// 現在のページセッション
#[derive(Debug, Clone)]
pub struct PageSession {
    username: String,
    auth_token: String,
    cookies: CookieSource,
}

impl PageSession {
    /// 新しいセッションを作成する
    pub fn new(
        username: impl Into<String>,
        auth_token: impl Into<String>,
        cookies: CookieSource,
    ) -> Self {
        Self {
            username: username.into(),
            auth_token: auth_token.into(),
            cookies,
        }
    }

    /// セッション設定から作成する
    ///
    /// Cookieファイルが指定されている場合は固定文字列より優先する
    pub fn from_config(config: &SessionConfig) -> AppResult<Self> {
        config.validate()?;

        let username = config
            .username
            .clone()
            .ok_or_else(|| AppError::configuration("ユーザー名が設定されていません"))?;
        let auth_token = config
            .auth_token
            .clone()
            .ok_or_else(|| AppError::configuration("認証トークンが設定されていません"))?;

        let cookies = match (&config.cookie_file, &config.cookie) {
            (Some(path), _) => CookieSource::File(path.clone()),
            (None, Some(cookie)) => CookieSource::Static(cookie.clone()),
            (None, None) => CookieSource::default(),
        };

        log::debug!("セッションを作成しました: user={username}");
        Ok(Self::new(username, auth_token, cookies))
    }

    /// 現在のユーザー名
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Authorizationヘッダーの値
    pub fn authorization_header(&self) -> String {
        format!("Token {}", self.auth_token)
    }

    /// 現在のCSRFトークンをCookieから読み込む
    ///
    /// Cookieが存在しない場合は空文字列を返す（サーバー側で拒否される）
    pub fn csrf_token(&self) -> AppResult<String> {
        let token = self.cookies.get(CSRF_COOKIE_NAME)?;
        if token.is_none() {
            log::warn!("CSRFトークンのCookieが見つかりません: name={CSRF_COOKIE_NAME}");
        }
        Ok(token.unwrap_or_default())
    }
}
