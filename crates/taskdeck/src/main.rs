//! CLI entry point for taskdeck.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

use taskdeck_app::{AppConfig, TaskListService};
use taskdeck_core::{Priority, SortOption, TaskStatus};
use taskdeck_store_json::JsonStore;

mod commands;
mod repl;

/// Single-user task list kept in a JSON document.
#[derive(Parser, Debug)]
#[command(
    name = "taskdeck",
    version,
    about = "taskdeck: tasks stored in a JSON document with sort, filter, and timed undo"
)]
struct Cli {
    /// Path to the task document (defaults to the platform data dir).
    #[arg(long)]
    store: Option<PathBuf>,

    /// Path to the configuration file (defaults to the platform config dir).
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new task.
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value = "medium")]
        priority: Priority,
        /// Due date, RFC 3339 or YYYY-MM-DD (midnight UTC).
        #[arg(long)]
        due: String,
    },

    /// List tasks with the active sort and filter.
    List {
        /// Sort order: priority, due, or alpha.
        #[arg(long)]
        sort: Option<SortOption>,
        /// Show only tasks with this status.
        #[arg(long, conflicts_with = "all")]
        filter: Option<TaskStatus>,
        /// Clear any configured status filter.
        #[arg(long)]
        all: bool,
        #[arg(long, value_enum, default_value = "table")]
        format: ListFormat,
    },

    /// Print one task as JSON.
    Show {
        /// Task id or unique id prefix.
        id: String,
    },

    /// Edit fields of an existing task.
    Edit {
        /// Task id or unique id prefix.
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, conflicts_with = "clear_description")]
        description: Option<String>,
        /// Remove the description entirely.
        #[arg(long)]
        clear_description: bool,
        #[arg(long)]
        priority: Option<Priority>,
        /// Due date, RFC 3339 or YYYY-MM-DD (midnight UTC).
        #[arg(long)]
        due: Option<String>,
    },

    /// Toggle a task between pending and completed.
    Done {
        /// Task id or unique id prefix.
        id: String,
    },

    /// Delete a task (undoable for a short while).
    Rm {
        /// Task id or unique id prefix.
        id: String,
    },

    /// Undo the most recent delete or status toggle.
    Undo {
        /// Which buffered action to undo; tries both when omitted.
        #[arg(value_enum)]
        kind: Option<UndoTarget>,
    },

    /// Move a task to a new position in the displayed order.
    Mv {
        /// Task id or unique id prefix.
        id: String,
        /// Target position, 1-based, within the displayed sequence.
        position: usize,
    },

    /// Interactive session that keeps the undo buffers alive.
    Repl,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ListFormat {
    Table,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum UndoTarget {
    Delete,
    Toggle,
}

fn main() -> Result<()> {
    let Cli { store, config, cmd } = Cli::parse();

    if should_install_tracing(&cmd) {
        install_tracing();
    }

    let config = load_config(config)?;
    let store_path = resolve_store_path(store, &config)?;
    execute_command(store_path, &config, cmd)
}

fn execute_command(store_path: PathBuf, config: &AppConfig, command: Command) -> Result<()> {
    let store = JsonStore::open(store_path)?;
    let mut service = TaskListService::new(store)
        .with_undo_windows(config.undo.delete_window(), config.undo.toggle_window());
    service.set_sort_option(config.list.sort_option()?);
    service.set_filter_status(config.list.filter_status()?);
    service.load()?;

    match command {
        Command::Repl => repl::run(&mut service),
        other => commands::run(other, &mut service),
    }
}

fn load_config(flag: Option<PathBuf>) -> Result<AppConfig> {
    let Some(path) = flag.or_else(default_config_path) else {
        return Ok(AppConfig::default());
    };
    AppConfig::from_path(path)
}

/// On Linux/macOS: `~/.config/taskdeck/config.toml`
/// On Windows: `%APPDATA%\taskdeck\config.toml`
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("taskdeck").join("config.toml"))
}

fn resolve_store_path(flag: Option<PathBuf>, config: &AppConfig) -> Result<PathBuf> {
    flag.or_else(|| config.store.path().map(Path::to_path_buf))
        .or_else(default_store_path)
        .context("could not determine a task document path; pass --store")
}

fn default_store_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("taskdeck").join("tasks.json"))
}

const fn should_install_tracing(cmd: &Command) -> bool {
    !matches!(cmd, Command::Repl)
}

fn install_tracing() {
    // EnvFilterに RUST_LOG を渡せる。デフォルトは INFO。
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .compact()
        .try_init();
}
