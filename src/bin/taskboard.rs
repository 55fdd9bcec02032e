//! Command-line front end for the task board.
//!
//! Usage:
//!
//! ```text
//! taskboard [--config <path>] [--api-url <url>] [--token <token>] <command>
//! ```
//!
//! Every command except `demo` talks to the task service at `--api-url`
//! (or `remote.base_url` in the config file), reloads the board, applies
//! the command, waits for the remote calls to finish and prints the result.
//! `demo` runs a scripted session against an in-process service.

use std::fmt::Write as _;
use std::io::{self, Write as _};
use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use mockable::{Clock, DefaultClock};
use thiserror::Error;
use tokio::runtime::Builder;
use tracing_subscriber::EnvFilter;

use taskboard::board::{
    adapters::{http::HttpTaskRemote, memory::InMemoryTaskRemote},
    domain::{NewTask, TaskFilter, TaskId},
    ports::TaskRemote,
    services::{Board, FaultBarrier, RecoveryScreen},
};
use taskboard::config::BoardConfig;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Personal task board.
#[derive(Debug, Parser)]
#[command(name = "taskboard", version)]
#[command(about = "Organize tasks into columns, search them, archive and restore them")]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, env = "TASKBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Task service API root, e.g. `http://localhost:8080/api/v1`.
    #[arg(long, env = "TASKBOARD_API_URL")]
    api_url: Option<String>,

    /// Bearer token for the task service.
    #[arg(long, env = "TASKBOARD_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the board.
    Show,

    /// Create a task.
    Add {
        /// Task title.
        #[arg(long)]
        title: String,

        /// Due date (YYYY-MM-DD).
        #[arg(long)]
        due: NaiveDate,

        /// Description.
        #[arg(long)]
        description: Option<String>,

        /// Initial column; defaults to "To Do".
        #[arg(long)]
        status: Option<String>,

        /// Category.
        #[arg(long)]
        category: Option<String>,
    },

    /// Move a task to another column.
    Move {
        /// Task identifier.
        id: String,
        /// Target column title.
        status: String,
    },

    /// Archive a task.
    Archive {
        /// Task identifier.
        id: String,
    },

    /// Delete an active task.
    Delete {
        /// Task identifier.
        id: String,
    },

    /// Restore an archived task.
    Restore {
        /// Task identifier.
        id: String,
    },

    /// Delete an archived task for good.
    Purge {
        /// Task identifier.
        id: String,
    },

    /// List archived tasks.
    Archived,

    /// Search tasks by title, description or status.
    Search {
        /// Search term.
        term: String,

        /// Only tasks in these columns.
        #[arg(long = "status")]
        statuses: Vec<String>,

        /// Only tasks in these categories.
        #[arg(long = "category")]
        categories: Vec<String>,
    },

    /// Run a scripted session against an in-process task service.
    Demo,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("no task service configured; pass --api-url or set remote.base_url")]
    MissingApiUrl,
}

fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let runtime = Builder::new_multi_thread().enable_all().build()?;
    runtime.block_on(run(cli))
}

async fn run(cli: Cli) -> Result<(), BoxError> {
    let config = match &cli.config {
        Some(path) => BoardConfig::load(path)?,
        None => BoardConfig::default(),
    };
    let barrier = FaultBarrier::new(config.bug_report_url.clone());

    if matches!(cli.command, Command::Demo) {
        return demo(&config, &barrier).await;
    }

    let base_url = cli
        .api_url
        .or_else(|| config.remote.base_url.clone())
        .ok_or(CliError::MissingApiUrl)?;
    let mut remote = HttpTaskRemote::new(base_url, config.remote.timeout())?;
    if let Some(token) = cli.token.or_else(|| config.remote.token.clone()) {
        remote = remote.with_token(token);
    }
    let mut board = Board::with_config(Arc::new(remote), Arc::new(DefaultClock), &config);
    execute(&mut board, cli.command, &barrier).await
}

async fn execute<R>(
    board: &mut Board<R, DefaultClock>,
    command: Command,
    barrier: &FaultBarrier,
) -> Result<(), BoxError>
where
    R: TaskRemote + 'static,
{
    let mut out = io::stdout().lock();
    if board.refresh().await.is_none() {
        out.write_all(render_notifications(board)?.as_bytes())?;
        return Ok(());
    }

    let mut show_archive = false;
    let done = match command {
        Command::Show | Command::Demo => true,
        Command::Add {
            title,
            due,
            description,
            status,
            category,
        } => {
            let mut input = NewTask::new(title).with_due_date(due);
            if let Some(text) = description {
                input = input.with_description(text);
            }
            if let Some(column) = status {
                input = input.with_status(column);
            }
            if let Some(name) = category {
                input = input.with_category(name);
            }
            board.create_task(input)?;
            true
        }
        Command::Move { id, status } => board.change_status(&TaskId::new(id)?, &status)?,
        Command::Archive { id } => board.archive_task(&TaskId::new(id)?),
        Command::Delete { id } => board.delete_task(&TaskId::new(id)?),
        Command::Restore { id } => board.restore_task(&TaskId::new(id)?)?,
        Command::Purge { id } => {
            show_archive = true;
            board.permanently_delete_task(&TaskId::new(id)?)
        }
        Command::Archived => {
            show_archive = true;
            true
        }
        Command::Search {
            term,
            statuses,
            categories,
        } => {
            board.search(term);
            board.set_filters(
                statuses
                    .into_iter()
                    .map(TaskFilter::Status)
                    .chain(categories.into_iter().map(TaskFilter::Category))
                    .collect(),
            );
            true
        }
    };
    if !done {
        writeln!(out, "No such task.")?;
    }
    board.settle().await;

    let view: &Board<R, DefaultClock> = board;
    let rendered = barrier.guard(|| {
        if show_archive {
            render_archive(view)
        } else {
            render_board(view)
        }
    });
    out.write_all(screen_or(rendered)?.as_bytes())?;
    out.write_all(render_notifications(board)?.as_bytes())?;
    Ok(())
}

async fn demo(config: &BoardConfig, barrier: &FaultBarrier) -> Result<(), BoxError> {
    let remote = Arc::new(InMemoryTaskRemote::new());
    let clock = Arc::new(DefaultClock);
    let today = clock.local().date_naive();
    let mut board = Board::with_config(Arc::clone(&remote), clock, config);
    let mut out = io::stdout().lock();

    board.create_task(NewTask::new("Buy milk").with_due_date(today))?;
    let report = board.create_task(
        NewTask::new("Write report")
            .with_description("Quarterly numbers")
            .with_due_date(today)
            .with_status("In Progress")
            .with_category("work"),
    )?;
    board.add_column("Review")?;
    board.create_task(
        NewTask::new("Proofread chapter")
            .with_due_date(today)
            .with_status("Review")
            .with_category("writing"),
    )?;
    board.settle().await;
    writeln!(out, "== Board after creating three tasks ==")?;
    out.write_all(screen_or(barrier.guard(|| render_board(&board)))?.as_bytes())?;

    board.search("milk");
    writeln!(out, "== Searching for \"milk\" ==")?;
    out.write_all(screen_or(barrier.guard(|| render_board(&board)))?.as_bytes())?;
    board.clear_search();

    let removal = board.remove_column("Review")?;
    board.settle().await;
    writeln!(
        out,
        "== Removed column \"{}\"; {} task(s) moved to To Do ==",
        removal.column.title(),
        removal.reassigned.len()
    )?;
    out.write_all(screen_or(barrier.guard(|| render_board(&board)))?.as_bytes())?;

    // Creates have settled, so the report carries its confirmed identifier.
    let report_id = board
        .tasks()
        .iter()
        .find(|task| task.title() == "Write report")
        .map_or(report, |task| task.id().clone());
    board.archive_task(&report_id);
    board.settle().await;
    writeln!(out, "== Archived \"Write report\" ==")?;
    out.write_all(screen_or(barrier.guard(|| render_archive(&board)))?.as_bytes())?;

    board.restore_task(&report_id)?;
    board.settle().await;

    remote.set_offline(true)?;
    board.change_status(&report_id, "Completed")?;
    board.settle().await;
    writeln!(out, "== Service offline while completing the report ==")?;
    out.write_all(render_notifications(&board)?.as_bytes())?;

    remote.set_offline(false)?;
    let failed: Vec<_> = board
        .notifications()
        .iter()
        .map(|notification| notification.id())
        .collect();
    for id in failed {
        board.retry(id);
    }
    board.settle().await;
    writeln!(out, "== Back online and retried ==")?;
    out.write_all(screen_or(barrier.guard(|| render_board(&board)))?.as_bytes())?;
    Ok(())
}

fn screen_or(
    rendered: Result<Result<String, std::fmt::Error>, RecoveryScreen>,
) -> Result<String, std::fmt::Error> {
    match rendered {
        Ok(text) => text,
        Err(screen) => {
            let mut text = String::new();
            writeln!(text, "Something went wrong: {}", screen.message())?;
            writeln!(text, "{}", screen.reset_hint())?;
            writeln!(text, "Report a bug: {}", screen.bug_report_url())?;
            Ok(text)
        }
    }
}

fn render_board<R>(board: &Board<R, DefaultClock>) -> Result<String, std::fmt::Error>
where
    R: TaskRemote + 'static,
{
    let today = DefaultClock.local().date_naive();
    let mut text = String::new();
    if board.is_search_active() {
        writeln!(
            text,
            "Search \"{}\": {} match(es)",
            board.query().term().trim(),
            board.search_results().len()
        )?;
    }
    for view in board.board_view() {
        writeln!(
            text,
            "{} {} ({})",
            view.decoration.emoji,
            view.column.title(),
            view.tasks.len()
        )?;
        for task in view.tasks {
            let due = task
                .due_date()
                .map(|date| date.to_string())
                .unwrap_or_default();
            let overdue = if task.is_overdue(today) { " overdue" } else { "" };
            writeln!(text, "  [{}] {} {due}{overdue}", task.id(), task.title())?;
        }
    }
    Ok(text)
}

fn render_archive<R>(board: &Board<R, DefaultClock>) -> Result<String, std::fmt::Error>
where
    R: TaskRemote + 'static,
{
    let now = DefaultClock.utc();
    let today = now.date_naive();
    let mut text = String::new();
    writeln!(text, "Archived ({})", board.archive().len())?;
    for record in board.archive() {
        let overdue = if record.is_overdue(today) { " overdue" } else { "" };
        writeln!(
            text,
            "  [{}] {} archived {} day(s) ago{overdue}",
            record.id(),
            record.snapshot().title(),
            record.days_archived(now)
        )?;
    }
    Ok(text)
}

fn render_notifications<R>(board: &Board<R, DefaultClock>) -> Result<String, std::fmt::Error>
where
    R: TaskRemote + 'static,
{
    let mut text = String::new();
    for notification in board.notifications() {
        let retry = if notification.is_retryable() {
            " (retryable)"
        } else {
            ""
        };
        writeln!(text, "! {}{retry}", notification.message())?;
    }
    Ok(text)
}
