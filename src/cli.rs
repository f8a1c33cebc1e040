use std::path::PathBuf;

use clap::{Args, Parser};

use crate::cmd::Commands;

/// Kanban board for a remote task-manager API.
/// Connection settings default to ~/.taskboard/config.toml.
#[derive(Parser)]
#[command(name = "tb", version, about = "Terminal Kanban board for your task manager")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Connection and logging flags shared by every subcommand.
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Path to the TOML config file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the task API, e.g. http://localhost:8000/api.
    #[arg(long, global = true, env = "TASKBOARD_API_URL")]
    pub api_url: Option<String>,

    /// API key sent with every request.
    #[arg(long, global = true, env = "TASKBOARD_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Log file used by the board UI.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Log level filter (RUST_LOG takes precedence).
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}
