/// コマンドラインインターフェース
///
/// ページ側の役割（セッションの用意、一覧の表示、ボタン操作）をコマンドとして提供する。
use crate::features::expenses::{
    Confirm, DeleteOutcome, ExpenseFilter, ExpenseInput, ExpenseListClient, FixedConfirm, GridConfig,
    HttpExpenseApi, RowAction, StdinConfirm,
};
use crate::shared::api_client::{ApiClient, ApiClientConfig};
use crate::shared::config::{ApiConfig, DisplayConfig, SessionConfig};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::session::PageSession;
use chrono::{Datelike, NaiveDate, NaiveTime};
use clap::{Args as ClapArgs, Parser, Subcommand};
use log::info;
use rust_decimal::Decimal;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "expense-list")]
#[command(version)]
#[command(about = "経費APIクライアント（一覧表示・登録・編集・削除）", long_about = None)]
pub struct Args {
    /// APIサーバーのベースURL（API_SERVER_URL）
    #[arg(long)]
    pub api_url: Option<String>,

    /// 現在のユーザー名（EXPENSE_USER）
    #[arg(long)]
    pub user: Option<String>,

    /// 認証トークン（EXPENSE_TOKEN）
    #[arg(long)]
    pub token: Option<String>,

    /// Cookie文字列（EXPENSE_COOKIE）
    #[arg(long, conflicts_with = "cookie_file")]
    pub cookie: Option<String>,

    /// Cookieファイル（EXPENSE_COOKIE_FILE）
    #[arg(long)]
    pub cookie_file: Option<PathBuf>,

    /// 1ページあたりの表示件数（EXPENSE_PAGE_SIZE）
    #[arg(long)]
    pub page_size: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 経費一覧を表示する
    List {
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// 経費を登録する
    Add {
        #[arg(long)]
        amount: String,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// 経費を編集する（指定しない項目は現在の値のまま）
    Edit {
        id: i64,
        #[arg(long)]
        amount: Option<String>,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// 経費を削除する
    Delete {
        id: i64,
        /// 確認せずに削除する
        #[arg(long)]
        yes: bool,
    },
    /// 週次レポートを表示する
    Report {
        #[arg(long)]
        week: Option<u32>,
        #[arg(long)]
        year: Option<i32>,
    },
    /// 対話モード
    Shell,
}

/// 一覧の絞り込み条件
#[derive(ClapArgs, Debug, Default, Clone)]
pub struct FilterArgs {
    #[arg(long)]
    pub date_after: Option<NaiveDate>,
    #[arg(long)]
    pub date_before: Option<NaiveDate>,
    #[arg(long)]
    pub time_after: Option<NaiveTime>,
    #[arg(long)]
    pub time_before: Option<NaiveTime>,
    #[arg(long)]
    pub amount_min: Option<Decimal>,
    #[arg(long)]
    pub amount_max: Option<Decimal>,
}

impl From<FilterArgs> for ExpenseFilter {
    fn from(args: FilterArgs) -> Self {
        Self {
            date_after: args.date_after,
            date_before: args.date_before,
            time_after: args.time_after,
            time_before: args.time_before,
            amount_min: args.amount_min,
            amount_max: args.amount_max,
        }
    }
}

/// 金額以外の入力項目
#[derive(ClapArgs, Debug, Default, Clone)]
pub struct FieldArgs {
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long)]
    pub time: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub comment: Option<String>,
}

impl FieldArgs {
    /// 指定された項目だけ入力欄に反映する
    pub fn apply(self, input: &mut ExpenseInput) {
        if let Some(date) = self.date {
            input.date = date;
        }
        if let Some(time) = self.time {
            input.time = time;
        }
        if let Some(description) = self.description {
            input.description = description;
        }
        if let Some(comment) = self.comment {
            input.comment = comment;
        }
    }
}

/// 実行時の設定一式
#[derive(Debug, Clone)]
pub struct ClientContext {
    pub api_config: ApiConfig,
    pub session_config: SessionConfig,
    pub display_config: DisplayConfig,
}

impl ClientContext {
    /// 環境変数の設定にコマンドライン引数を上書きして作成する
    pub fn from_args(args: &Args) -> Self {
        let mut api_config = ApiConfig::from_env();
        let mut session_config = SessionConfig::from_env();
        let mut display_config = DisplayConfig::from_env();

        if let Some(url) = &args.api_url {
            api_config.base_url = url.clone();
        }
        if let Some(user) = &args.user {
            session_config.username = Some(user.clone());
        }
        if let Some(token) = &args.token {
            session_config.auth_token = Some(token.clone());
        }
        if let Some(cookie) = &args.cookie {
            session_config.cookie = Some(cookie.clone());
            session_config.cookie_file = None;
        }
        if let Some(path) = &args.cookie_file {
            session_config.cookie_file = Some(path.clone());
        }
        if let Some(page_size) = args.page_size.filter(|size| *size > 0) {
            display_config.page_size = page_size;
        }

        Self {
            api_config,
            session_config,
            display_config,
        }
    }

    /// 確認方法を指定して経費一覧クライアントを作成する
    pub fn build_client<C: Confirm>(
        &self,
        confirm: C,
    ) -> AppResult<ExpenseListClient<HttpExpenseApi, C>> {
        self.api_config.validate()?;
        let session = Arc::new(PageSession::from_config(&self.session_config)?);
        let api_client = ApiClient::new_with_config(ApiClientConfig::from(self.api_config.clone()))?;
        let username = session.username().to_string();

        Ok(ExpenseListClient::new(
            HttpExpenseApi::new(api_client, session),
            confirm,
            username,
            GridConfig::with_page_size(self.display_config.page_size),
        ))
    }
}

/// コマンドを実行する
pub async fn run(args: Args) -> AppResult<()> {
    let context = ClientContext::from_args(&args);

    match args.command {
        Command::List { page, filter } => {
            let mut client = context.build_client(StdinConfirm)?;
            client.set_filter(filter.into());
            client.fetch_and_render().await?;
            print_grid(&client, page);
        }
        Command::Add { amount, fields } => {
            let mut client = context.build_client(StdinConfirm)?;
            client.fetch_and_render().await?;
            let form = client.open_new_expense_form();
            form.input.amount = amount;
            fields.apply(&mut form.input);
            client.submit_new_expense().await?;
            println!("経費を登録しました");
            print_grid(&client, 1);
        }
        Command::Edit { id, amount, fields } => {
            let mut client = context.build_client(StdinConfirm)?;
            client.fetch_and_render().await?;
            let form = client
                .edit(id)
                .ok_or_else(|| AppError::not_found(format!("経費(id={id})")))?;
            if let Some(amount) = amount {
                form.input.amount = amount;
            }
            fields.apply(&mut form.input);
            client.submit_edit().await?;
            println!("経費を更新しました: id={id}");
            print_grid(&client, 1);
        }
        Command::Delete { id, yes } => {
            if yes {
                delete_once(context.build_client(FixedConfirm(true))?, id).await?;
            } else {
                delete_once(context.build_client(StdinConfirm)?, id).await?;
            }
        }
        Command::Report { week, year } => {
            let mut client = context.build_client(StdinConfirm)?;
            client.fetch_and_render().await?;
            let current = chrono::Local::now().date_naive().iso_week();
            let report = client.weekly_report(
                year.unwrap_or_else(|| current.year()),
                week.unwrap_or_else(|| current.week()),
            );
            println!("{report}");
        }
        Command::Shell => {
            let client = context.build_client(StdinConfirm)?;
            run_shell(client).await?;
        }
    }

    Ok(())
}

async fn delete_once<C: Confirm>(
    mut client: ExpenseListClient<HttpExpenseApi, C>,
    id: i64,
) -> AppResult<()> {
    client.fetch_and_render().await?;
    let outcome = client.delete(id).await?;
    println!("{}", describe_delete(outcome, id));
    if outcome == DeleteOutcome::Deleted {
        print_grid(&client, 1);
    }
    Ok(())
}

fn describe_delete(outcome: DeleteOutcome, id: i64) -> String {
    match outcome {
        DeleteOutcome::Declined => "削除を取り消しました".to_string(),
        DeleteOutcome::Unknown => format!("経費が見つかりません: id={id}"),
        DeleteOutcome::Deleted => format!("経費を削除しました: id={id}"),
    }
}

fn print_grid<C: Confirm>(client: &ExpenseListClient<HttpExpenseApi, C>, page: usize) {
    if let Some(grid) = client.grid() {
        println!("{}", grid.render_page(page));
    }
}

/// 対話モードの1行分のコマンド
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    List,
    Page(usize),
    Add,
    Action(String),
    Report(Option<u32>, Option<i32>),
    Help,
    Quit,
    Unknown(String),
}

impl ShellCommand {
    /// 入力行を解析する
    ///
    /// `edit 3`と`edit:3`（ボタンのトークン）のどちらも受け付ける
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let head = words.next()?;
        let arg = words.next();

        let command = match head {
            "list" | "ls" | "refresh" => ShellCommand::List,
            "page" => match arg.and_then(|a| a.parse().ok()) {
                Some(page) => ShellCommand::Page(page),
                None => ShellCommand::Unknown(line.trim().to_string()),
            },
            "add" => ShellCommand::Add,
            "edit" | "delete" => match arg {
                Some(id) => ShellCommand::Action(format!("{head}:{id}")),
                None => ShellCommand::Unknown(line.trim().to_string()),
            },
            "report" => ShellCommand::Report(
                arg.and_then(|a| a.parse().ok()),
                words.next().and_then(|a| a.parse().ok()),
            ),
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" | "q" => ShellCommand::Quit,
            token if token.contains(':') => ShellCommand::Action(token.to_string()),
            _ => ShellCommand::Unknown(line.trim().to_string()),
        };
        Some(command)
    }
}

const SHELL_HELP: &str = "\
コマンド一覧:
  list               一覧を取得し直す
  page N             Nページ目を表示する
  add                経費を登録する
  edit ID / edit:ID  経費を編集する
  delete ID / delete:ID  経費を削除する
  report [週] [年]   週次レポートを表示する
  quit               終了する";

/// 標準入力から1行読み込む（EOFの場合はNone）
fn read_line(prompt: &str) -> AppResult<Option<String>> {
    print!("{prompt}");
    std::io::stdout().flush()?;

    let mut line = String::new();
    let read = std::io::stdin().lock().read_line(&mut line)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// 対話入力で項目を空にするための入力値
const CLEAR_ANSWER: &str = "-";

/// 対話入力の回答を入力欄に反映する
///
/// 空欄の場合は現在の値のまま、`-`の場合は値を消す
fn apply_answer(value: &mut String, answer: &str) {
    match answer {
        "" => {}
        CLEAR_ANSWER => value.clear(),
        _ => *value = answer.to_string(),
    }
}

/// 入力欄を1項目ずつ対話的に埋める
fn prompt_input(input: &mut ExpenseInput) -> AppResult<()> {
    let fields: [(&str, &mut String); 5] = [
        ("金額", &mut input.amount),
        ("日付 (YYYY-MM-DD)", &mut input.date),
        ("時刻 (HH:MM)", &mut input.time),
        ("説明", &mut input.description),
        ("コメント", &mut input.comment),
    ];

    println!("（空欄で現在の値のまま、{CLEAR_ANSWER}で値を消去）");
    for (label, value) in fields {
        let prompt = format!("{label} [{value}]: ");
        if let Some(answer) = read_line(&prompt)? {
            apply_answer(value, &answer);
        }
    }
    Ok(())
}

/// 対話モードを実行する
///
/// 起動時に一覧を取得し、以降はキャッシュを保持したまま操作を受け付ける。
/// 個々の操作の失敗は表示のみ行い、対話は継続する。
async fn run_shell<C: Confirm>(mut client: ExpenseListClient<HttpExpenseApi, C>) -> AppResult<()> {
    info!("対話モードを開始します: user={}", client.username());
    let mut page = 1;

    if let Err(e) = client.fetch_and_render().await {
        eprintln!("エラー: {}", e.user_message());
    }
    print_grid(&client, page);

    while let Some(line) = read_line("> ")? {
        let Some(command) = ShellCommand::parse(&line) else {
            continue;
        };

        let result = match command {
            ShellCommand::Quit => break,
            ShellCommand::Help => {
                println!("{SHELL_HELP}");
                Ok(())
            }
            ShellCommand::List => {
                page = 1;
                client.fetch_and_render().await
            }
            ShellCommand::Page(n) => {
                page = n;
                Ok(())
            }
            ShellCommand::Add => shell_add(&mut client).await,
            ShellCommand::Action(token) => shell_action(&mut client, &token).await,
            ShellCommand::Report(week, year) => {
                let current = chrono::Local::now().date_naive().iso_week();
                let report = client.weekly_report(
                    year.unwrap_or_else(|| current.year()),
                    week.unwrap_or_else(|| current.week()),
                );
                println!("{report}");
                continue;
            }
            ShellCommand::Unknown(text) => {
                println!("不明なコマンドです: {text}（helpで一覧を表示）");
                continue;
            }
        };

        match result {
            Ok(()) => print_grid(&client, page),
            Err(e) => eprintln!("エラー: {}", e.user_message()),
        }
    }

    info!("対話モードを終了します");
    Ok(())
}

async fn shell_add<C: Confirm>(client: &mut ExpenseListClient<HttpExpenseApi, C>) -> AppResult<()> {
    let form = client.open_new_expense_form();
    prompt_input(&mut form.input)?;
    let result = client.submit_new_expense().await;
    if result.is_err() {
        client.cancel_new_expense_form();
    }
    result
}

async fn shell_action<C: Confirm>(
    client: &mut ExpenseListClient<HttpExpenseApi, C>,
    token: &str,
) -> AppResult<()> {
    let action = client.grid().and_then(|grid| grid.action(token));

    match action {
        Some(RowAction::Edit(id)) => {
            let Some(form) = client.edit(id) else {
                return Err(AppError::not_found(format!("経費(id={id})")));
            };
            prompt_input(&mut form.input)?;
            client.submit_edit().await
        }
        Some(RowAction::Delete(id)) => {
            let outcome = client.delete(id).await?;
            println!("{}", describe_delete(outcome, id));
            Ok(())
        }
        None => Err(AppError::not_found(format!("操作 {token}"))),
    }
}
