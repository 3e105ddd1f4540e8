pub mod cookies;

use crate::shared::errors::{AppError, AppResult};
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use std::str::FromStr;

/// 金額の整数部の上限（サーバー側は全10桁・小数2桁）
const AMOUNT_INTEGER_LIMIT: i64 = 100_000_000;

/// 説明・コメントの最大文字数（サーバー側のカラム長）
pub const MAX_TEXT_LENGTH: usize = 1024;

/// 金額文字列を解析する
///
/// # 引数
/// * `amount_str` - 入力欄の金額文字列
///
/// # 戻り値
/// 解析済みの金額、空欄や不正な値の場合はバリデーションエラー
///
/// # バリデーション規則
/// - 空欄でないこと
/// - 10進数として解析できること
/// - 小数点以下は2桁まで
/// - 整数部は8桁まで
pub fn parse_amount(amount_str: &str) -> AppResult<Decimal> {
    let trimmed = amount_str.trim();
    validate_required_field(trimmed, "金額")?;

    let amount = Decimal::from_str(trimmed)
        .map_err(|_| AppError::validation(format!("金額が数値ではありません: {trimmed}")))?
        .normalize();

    if amount.scale() > 2 {
        return Err(AppError::validation(
            "金額は小数点以下2桁まで入力してください",
        ));
    }

    if amount.abs() >= Decimal::from(AMOUNT_INTEGER_LIMIT) {
        return Err(AppError::validation("金額は整数部8桁以内で入力してください"));
    }

    Ok(amount)
}

/// 日付文字列を解析する（空欄の場合はNone）
///
/// # 引数
/// * `date_str` - 日付文字列（YYYY-MM-DD形式）
pub fn parse_optional_date(date_str: &str) -> AppResult<Option<NaiveDate>> {
    let trimmed = date_str.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| AppError::validation("日付はYYYY-MM-DD形式で入力してください"))
}

/// 時刻文字列を解析する（空欄の場合はNone）
///
/// `HH:MM`と`HH:MM:SS`の両方を受け付ける
pub fn parse_optional_time(time_str: &str) -> AppResult<Option<NaiveTime>> {
    let trimmed = time_str.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map(Some)
        .map_err(|_| AppError::validation("時刻はHH:MMまたはHH:MM:SS形式で入力してください"))
}

/// 文字列の長さバリデーション
///
/// # 引数
/// * `text` - 検証対象の文字列
/// * `max_length` - 最大文字数
/// * `field_name` - フィールド名（エラーメッセージ用）
pub fn validate_text_length(text: &str, max_length: usize, field_name: &str) -> AppResult<()> {
    let char_count = text.chars().count();
    if char_count > max_length {
        return Err(AppError::validation(format!(
            "{field_name}は{max_length}文字以内で入力してください（現在: {char_count}文字）"
        )));
    }
    Ok(())
}

/// 必須フィールドのバリデーション
pub fn validate_required_field(text: &str, field_name: &str) -> AppResult<()> {
    if text.trim().is_empty() {
        return Err(AppError::validation(format!("{field_name}は必須項目です")));
    }
    Ok(())
}

/// 任意入力のテキストを検証する
///
/// 空欄も有効な値として扱う（既存の値を消す場合に空文字列を送信するため）
pub fn text_field(text: &str, field_name: &str) -> AppResult<String> {
    validate_text_length(text, MAX_TEXT_LENGTH, field_name)?;
    Ok(text.to_string())
}

/// 文字列の表示幅（文字数）に合わせて右側を空白で埋める
pub fn pad_to_width(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        text.to_string()
    } else {
        format!("{text}{}", " ".repeat(width - len))
    }
}
