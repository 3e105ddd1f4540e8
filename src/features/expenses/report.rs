use crate::features::expenses::models::ExpenseRecord;
use chrono::Datelike;
use rust_decimal::Decimal;
use std::fmt;

/// 週次レポート（ISO週単位の合計・平均）
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyReport {
    pub year: i32,
    pub week: u32,
    pub count: usize,
    /// 合計金額（対象データがない場合はNone）
    pub total: Option<Decimal>,
    /// 平均金額（小数点以下2桁に丸める、対象データがない場合はNone）
    pub average: Option<Decimal>,
}

impl WeeklyReport {
    /// 経費データから指定週のレポートを集計する
    pub fn compute(records: &[ExpenseRecord], year: i32, week: u32) -> Self {
        let amounts: Vec<Decimal> = records
            .iter()
            .filter(|record| {
                let iso = record.date.iso_week();
                iso.year() == year && iso.week() == week
            })
            .map(|record| record.amount)
            .collect();

        let count = amounts.len();
        let total = (count > 0).then(|| amounts.iter().copied().sum::<Decimal>());
        let average = total.map(|total| (total / Decimal::from(count)).round_dp(2));

        Self {
            year,
            week,
            count,
            total,
            average,
        }
    }
}

impl fmt::Display for WeeklyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |value: Option<Decimal>| value.map_or_else(|| "-".to_string(), |v| v.to_string());
        writeln!(f, "週次レポート: {}年 第{}週 （{}件）", self.year, self.week, self.count)?;
        writeln!(f, "\t合計: {}", show(self.total))?;
        write!(f, "\t平均: {}", show(self.average))
    }
}
