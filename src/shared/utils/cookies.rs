use crate::shared::errors::AppResult;
use std::path::PathBuf;

/// Cookie文字列から指定した名前の値を取得する
///
/// # 引数
/// * `cookie_str` - `name=value; name2=value2`形式のCookie文字列
/// * `name` - 取得するCookie名
///
/// # 戻り値
/// 最初に一致したCookieの値（パーセントデコード済み）、見つからない場合はNone
pub fn get_cookie(cookie_str: &str, name: &str) -> Option<String> {
    if cookie_str.is_empty() {
        return None;
    }

    let prefix = format!("{name}=");
    cookie_str
        .split(';')
        .map(str::trim)
        .find_map(|cookie| cookie.strip_prefix(prefix.as_str()))
        .map(|raw| match urlencoding::decode(raw) {
            Ok(decoded) => decoded.into_owned(),
            Err(e) => {
                log::warn!("Cookie値のデコードに失敗したため生の値を使用します: name={name}, error={e}");
                raw.to_string()
            }
        })
}

/// Cookieの取得元
#[derive(Debug, Clone)]
pub enum CookieSource {
    /// 固定のCookie文字列
    Static(String),
    /// Cookieファイル（読み込みのたびにファイルを開き直す）
    File(PathBuf),
}

impl CookieSource {
    /// 現在のCookie文字列を読み込む
    ///
    /// ファイルの場合は改行をCookie区切りとして扱う
    pub fn load(&self) -> AppResult<String> {
        match self {
            CookieSource::Static(value) => Ok(value.clone()),
            CookieSource::File(path) => {
                let content = std::fs::read_to_string(path)?;
                Ok(content
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .collect::<Vec<_>>()
                    .join("; "))
            }
        }
    }

    /// 指定した名前のCookie値を取得する
    pub fn get(&self, name: &str) -> AppResult<Option<String>> {
        let cookie_str = self.load()?;
        Ok(get_cookie(&cookie_str, name))
    }
}

impl Default for CookieSource {
    fn default() -> Self {
        CookieSource::Static(String::new())
    }
}
