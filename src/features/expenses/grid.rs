/// 経費一覧のデータグリッド
///
/// 取得した経費データを並べ替え・ページ分割してテキストの表として描画する。
/// 各行は編集・削除の操作ボタンを持つ。
use crate::features::expenses::models::ExpenseRecord;
use crate::shared::utils::pad_to_width;
use std::cmp::Ordering;

/// グリッドの列
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridColumn {
    Date,
    Time,
    Amount,
    Comment,
    Description,
}

impl GridColumn {
    /// 表示順の全列
    pub const ALL: [GridColumn; 5] = [
        GridColumn::Date,
        GridColumn::Time,
        GridColumn::Amount,
        GridColumn::Comment,
        GridColumn::Description,
    ];

    /// 列見出し
    pub fn title(self) -> &'static str {
        match self {
            GridColumn::Date => "日付",
            GridColumn::Time => "時刻",
            GridColumn::Amount => "金額",
            GridColumn::Comment => "コメント",
            GridColumn::Description => "説明",
        }
    }

    fn cell(self, record: &ExpenseRecord) -> String {
        match self {
            GridColumn::Date => record.date.format("%Y-%m-%d").to_string(),
            GridColumn::Time => record.time.format("%H:%M:%S").to_string(),
            GridColumn::Amount => record.amount.to_string(),
            GridColumn::Comment => record.comment.clone().unwrap_or_default(),
            GridColumn::Description => record.description.clone().unwrap_or_default(),
        }
    }

    fn compare(self, a: &ExpenseRecord, b: &ExpenseRecord) -> Ordering {
        match self {
            GridColumn::Date => a.date.cmp(&b.date),
            GridColumn::Time => a.time.cmp(&b.time),
            GridColumn::Amount => a.amount.cmp(&b.amount),
            GridColumn::Comment => a.comment.cmp(&b.comment),
            GridColumn::Description => a.description.cmp(&b.description),
        }
    }
}

/// 並び順
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// グリッド設定
#[derive(Debug, Clone)]
pub struct GridConfig {
    /// 並び替えキー（先頭が優先）
    pub order: Vec<(GridColumn, SortDirection)>,
    /// 1ページあたりの行数
    pub page_size: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            order: vec![
                (GridColumn::Date, SortDirection::Asc),
                (GridColumn::Time, SortDirection::Asc),
            ],
            page_size: 10,
        }
    }
}

impl GridConfig {
    /// ページサイズを指定して作成する（並び順は日付・時刻の昇順）
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            ..Self::default()
        }
    }
}

/// 行の操作ボタン
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Edit(i64),
    Delete(i64),
}

impl RowAction {
    /// ボタンのトークン（`edit:3`、`delete:3`）を解析する
    pub fn parse(token: &str) -> Option<Self> {
        let (kind, id) = token.trim().split_once(':')?;
        let id = id.trim().parse().ok()?;
        match kind.trim() {
            "edit" => Some(RowAction::Edit(id)),
            "delete" => Some(RowAction::Delete(id)),
            _ => None,
        }
    }

    /// 対象の経費ID
    pub fn id(self) -> i64 {
        match self {
            RowAction::Edit(id) | RowAction::Delete(id) => id,
        }
    }

    /// ボタンの表示
    pub fn label(self) -> String {
        match self {
            RowAction::Edit(id) => format!("[edit:{id}]"),
            RowAction::Delete(id) => format!("[delete:{id}]"),
        }
    }
}

/// グリッドの1行
#[derive(Debug, Clone, PartialEq)]
pub struct GridRow {
    pub id: i64,
    pub cells: Vec<String>,
    pub actions: [RowAction; 2],
}

/// データグリッド
///
/// 再描画時は古いインスタンスを`destroy`してから新しく`initialize`する。
#[derive(Debug)]
pub struct DataGrid {
    config: GridConfig,
    rows: Vec<GridRow>,
}

impl DataGrid {
    /// 経費データからグリッドを初期化する
    ///
    /// 設定の並び順で安定ソートするため、同じキーの行はサーバーの返却順を保つ
    pub fn initialize(config: GridConfig, records: &[ExpenseRecord]) -> Self {
        let mut sorted: Vec<&ExpenseRecord> = records.iter().collect();
        sorted.sort_by(|a, b| {
            config
                .order
                .iter()
                .map(|(column, direction)| {
                    let ordering = column.compare(a, b);
                    match direction {
                        SortDirection::Asc => ordering,
                        SortDirection::Desc => ordering.reverse(),
                    }
                })
                .find(|ordering| *ordering != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });

        let rows = sorted
            .into_iter()
            .map(|record| GridRow {
                id: record.id,
                cells: GridColumn::ALL.iter().map(|c| c.cell(record)).collect(),
                actions: [RowAction::Edit(record.id), RowAction::Delete(record.id)],
            })
            .collect();

        log::debug!("データグリッドを初期化しました: rows={}", records.len());
        Self { config, rows }
    }

    /// グリッドを破棄し、行と操作ボタンの割り当てを解放する
    pub fn destroy(self) {
        log::debug!("データグリッドを破棄しました: rows={}", self.rows.len());
    }

    /// 表示順の行
    pub fn rows(&self) -> &[GridRow] {
        &self.rows
    }

    /// 表示順の経費ID
    pub fn row_ids(&self) -> Vec<i64> {
        self.rows.iter().map(|row| row.id).collect()
    }

    /// 総ページ数（行がない場合も1ページ）
    pub fn page_count(&self) -> usize {
        let page_size = self.config.page_size.max(1);
        self.rows.len().div_ceil(page_size).max(1)
    }

    /// ボタンのトークンを現在の行に割り当てられた操作として解決する
    pub fn action(&self, token: &str) -> Option<RowAction> {
        let action = RowAction::parse(token)?;
        self.rows
            .iter()
            .any(|row| row.actions.contains(&action))
            .then_some(action)
    }

    /// 指定ページ（1始まり）の行
    pub fn page_rows(&self, page: usize) -> &[GridRow] {
        let page_size = self.config.page_size.max(1);
        let page = page.clamp(1, self.page_count());
        let start = (page - 1) * page_size;
        let end = (start + page_size).min(self.rows.len());
        self.rows.get(start..end).unwrap_or_default()
    }

    /// 指定ページ（1始まり）をテキストの表として描画する
    pub fn render_page(&self, page: usize) -> String {
        let page = page.clamp(1, self.page_count());
        let rows = self.page_rows(page);

        let headers: Vec<&str> = GridColumn::ALL.iter().map(|c| c.title()).collect();
        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for row in rows {
            for (width, cell) in widths.iter_mut().zip(&row.cells) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut lines = Vec::with_capacity(rows.len() + 3);
        let header_line: Vec<String> = headers
            .iter()
            .zip(&widths)
            .map(|(h, w)| pad_to_width(h, *w))
            .collect();
        lines.push(format!("{} | 操作", header_line.join(" | ")));
        lines.push(
            widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("-+-")
                + "-+-----",
        );

        if rows.is_empty() {
            lines.push("（経費データがありません）".to_string());
        }

        for row in rows {
            let cells: Vec<String> = row
                .cells
                .iter()
                .zip(&widths)
                .map(|(cell, w)| pad_to_width(cell, *w))
                .collect();
            let actions: Vec<String> = row.actions.iter().map(|a| a.label()).collect();
            lines.push(format!("{} | {}", cells.join(" | "), actions.join(" ")));
        }

        lines.push(format!(
            "ページ {page}/{} （全{}件）",
            self.page_count(),
            self.rows.len()
        ));

        lines.join("\n")
    }
}
