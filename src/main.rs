//! # tb - Terminal Kanban board
//!
//! A Kanban view over a remote task-manager API. Tasks are grouped into three
//! columns (To Do, In Progress, Done); moving a card between columns updates
//! the task's status on the server, and every change is followed by a fresh
//! fetch so the board always shows the server's state.
//!
//! ## Key Features
//!
//! - **Interactive Board**: `tb ui` opens a three-column board with keyboard drag and drop
//! - **Task Editing**: Create, edit and delete tasks from a popup form or the CLI
//! - **Review Loop**: Append comments and set a 0-5 self evaluation on finished tasks
//! - **Scriptable**: Every board action is also a CLI subcommand
//!
//! ## Quick Start
//!
//! ```bash
//! # Point tb at your API
//! export TASKBOARD_API_URL=http://localhost:8000/api
//! export TASKBOARD_API_KEY=...
//!
//! # Open the board
//! tb ui
//!
//! # Add a task and move it along
//! tb add "Write report" --priority high --deadline friday
//! tb move "Write report" in-progress
//!
//! # List tasks
//! tb list
//! ```
//!
//! ## Configuration
//!
//! Settings are read from `~/.taskboard/config.toml`, overridden by
//! environment variables and command-line flags:
//!
//! ```toml
//! api_url = "https://tasks.example.com/api"
//! api_key = "secret"
//! timeout_secs = 10
//! log_level = "debug"
//! ```
//!
//! The board UI logs to `~/.taskboard/taskboard.log`; other commands log to stderr.

use std::process;

use anyhow::Context;
use clap::Parser;

pub mod api;
pub mod board;
pub mod cli;
pub mod cmd;
pub mod columns;
pub mod config;
pub mod dates;
pub mod display;
pub mod drag;
pub mod error;
pub mod fields;
pub mod form;
pub mod logging;
pub mod store;
pub mod task;
#[cfg(test)]
mod testing;
pub mod tui {
    pub mod board;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod task_form;
    pub mod utils;
}

use api::HttpTaskApi;
use board::Board;
use cli::{Cli, GlobalArgs};
use cmd::*;
use config::{taskboard_dir, Config};
use logging::{init_logging, LogTarget};

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

/// Resolve config, start logging, and build a board over the HTTP API.
/// Returns the board (not yet loaded) and the API base URL.
fn connect(global: &GlobalArgs, ui: bool) -> anyhow::Result<(Board<HttpTaskApi>, String)> {
    let dir = taskboard_dir().context("failed to create the taskboard directory")?;
    let config = Config::resolve(global, &dir).context("failed to load configuration")?;

    // The UI owns the terminal, so it logs to a file
    let target = if ui { LogTarget::File(&config.log_file) } else { LogTarget::Stderr };
    init_logging(target, &config.log_level)?;
    tracing::debug!(api = %config.api.base_url, "configuration resolved");

    let api = HttpTaskApi::new(config.api.clone()).context("failed to build the HTTP client")?;
    let source = api.base_url().to_string();
    Ok((Board::new(api), source))
}

/// A board loaded with the server's current tasks, for one CLI command.
fn open_board(global: &GlobalArgs) -> anyhow::Result<Board<HttpTaskApi>> {
    let (mut board, source) = connect(global, false)?;
    board
        .reload()
        .with_context(|| format!("failed to load tasks from {source}"))?;
    Ok(board)
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let Cli { global, command } = cli;

    match command {
        // Completions need neither config nor network
        Commands::Completions { shell } => cmd_completions(shell),
        // The UI loads on its own so it can show progress and errors in place
        Commands::Ui => {
            let (board, source) = connect(&global, true)?;
            cmd_ui(board, &source)?;
        }
        Commands::List { status } => cmd_list(&open_board(&global)?, status),
        Commands::View { task } => cmd_view(&open_board(&global)?, &task)?,
        Commands::Add { title, desc, priority, deadline, status } =>
            cmd_add(&mut open_board(&global)?, title, desc, priority, deadline, status)?,
        Commands::Update { task, title, desc, priority, deadline, clear_deadline, status } =>
            cmd_update(&mut open_board(&global)?, &task, title, desc, priority, deadline, clear_deadline, status)?,
        Commands::Move { task, to } => cmd_move(&mut open_board(&global)?, &task, to)?,
        Commands::Delete { task, yes } => cmd_delete(&mut open_board(&global)?, &task, yes)?,
        Commands::Comment { task, text } => cmd_comment(&mut open_board(&global)?, &task, &text)?,
        Commands::Evaluate { task, score } => cmd_evaluate(&mut open_board(&global)?, &task, score)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::parse_from(["tb", "list", "--api-url", "http://127.0.0.1:9000"]);
        assert_eq!(cli.global.api_url.as_deref(), Some("http://127.0.0.1:9000"));
        assert!(matches!(cli.command, Commands::List { status: None }));
    }

    #[test]
    fn completions_run_without_configuration() {
        // An invalid URL would fail config resolution if it were attempted.
        let cli = Cli::parse_from(["tb", "--api-url", "not-a-url", "completions", "bash"]);
        assert!(run(cli).is_ok());
    }
}
