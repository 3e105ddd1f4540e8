use crate::shared::errors::AppResult;
use crate::shared::utils::{parse_amount, parse_optional_date, parse_optional_time, text_field};
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// 経費データモデル（APIサーバーから取得した1件分）
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ExpenseRecord {
    /// サーバー側で採番されるID（`pk`としても受け付ける）
    #[serde(alias = "pk")]
    pub id: i64,
    /// 所有ユーザー
    #[serde(deserialize_with = "string_or_number")]
    pub user: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub amount: Decimal,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

/// ユーザー識別子は文字列・数値のどちらでも受け付ける
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Owner {
        Name(String),
        Id(i64),
    }

    Ok(match Owner::deserialize(deserializer)? {
        Owner::Name(name) => name,
        Owner::Id(id) => id.to_string(),
    })
}

/// 経費の書き込み用フィールド（作成・更新で共通）
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseFields {
    pub amount: Decimal,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub description: String,
    pub comment: String,
}

impl ExpenseFields {
    /// フォーム送信用のキーと値の組に変換する
    ///
    /// 未入力の日付・時刻は送信しない（サーバー側は空文字列の日付を受け付けない）。
    /// 説明とコメントは空欄でも常に送信し、PUTで既存の値を消せるようにする。
    pub fn to_form_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("amount".to_string(), self.amount.to_string())];

        if let Some(date) = self.date {
            pairs.push(("date".to_string(), date.format("%Y-%m-%d").to_string()));
        }
        if let Some(time) = self.time {
            pairs.push(("time".to_string(), time.format("%H:%M:%S").to_string()));
        }
        pairs.push(("description".to_string(), self.description.clone()));
        pairs.push(("comment".to_string(), self.comment.clone()));

        pairs
    }
}

/// 入力欄の値（フォームに入力されたままの文字列）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseInput {
    pub amount: String,
    pub date: String,
    pub time: String,
    pub description: String,
    pub comment: String,
}

impl ExpenseInput {
    /// 入力値を検証して書き込み用フィールドに変換する
    ///
    /// 金額が空欄の場合はバリデーションエラーとなり、リクエストは送信されない
    pub fn to_fields(&self) -> AppResult<ExpenseFields> {
        Ok(ExpenseFields {
            amount: parse_amount(&self.amount)?,
            date: parse_optional_date(&self.date)?,
            time: parse_optional_time(&self.time)?,
            description: text_field(&self.description, "説明")?,
            comment: text_field(&self.comment, "コメント")?,
        })
    }

    /// 全ての入力欄を空にする
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// 既存の経費データから入力値を作成する
    pub fn from_record(record: &ExpenseRecord) -> Self {
        Self {
            amount: record.amount.to_string(),
            date: record.date.format("%Y-%m-%d").to_string(),
            time: record.time.format("%H:%M:%S").to_string(),
            description: record.description.clone().unwrap_or_default(),
            comment: record.comment.clone().unwrap_or_default(),
        }
    }
}

/// 経費一覧の絞り込み条件
///
/// APIサーバーの範囲フィルター（日付・時刻・金額）に対応する
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseFilter {
    pub date_after: Option<NaiveDate>,
    pub date_before: Option<NaiveDate>,
    pub time_after: Option<NaiveTime>,
    pub time_before: Option<NaiveTime>,
    pub amount_min: Option<Decimal>,
    pub amount_max: Option<Decimal>,
}

impl ExpenseFilter {
    /// クエリパラメータに変換する
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();

        if let Some(date) = self.date_after {
            query.push(("date_after".to_string(), date.format("%Y-%m-%d").to_string()));
        }
        if let Some(date) = self.date_before {
            query.push(("date_before".to_string(), date.format("%Y-%m-%d").to_string()));
        }
        if let Some(time) = self.time_after {
            query.push(("time_after".to_string(), time.format("%H:%M:%S").to_string()));
        }
        if let Some(time) = self.time_before {
            query.push(("time_before".to_string(), time.format("%H:%M:%S").to_string()));
        }
        if let Some(amount) = self.amount_min {
            query.push(("amount_min".to_string(), amount.to_string()));
        }
        if let Some(amount) = self.amount_max {
            query.push(("amount_max".to_string(), amount.to_string()));
        }

        query
    }
}
