//! Configuration loading.
//!
//! Settings come from, in order of precedence: command-line flags (which
//! clap also fills from `TASKBOARD_*` environment variables), the TOML
//! config file, and built-in defaults. The config file lives at
//! `~/.taskboard/config.toml` unless `--config` points elsewhere; a missing
//! file is not an error.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::cli::GlobalArgs;
use crate::error::{Error, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_API_KEY_HEADER: &str = "x-api-key";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub api_key_header: Option<String>,
    pub timeout_secs: Option<u64>,
    pub log_file: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl FileConfig {
    /// Read a config file; a file that does not exist yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(FileConfig::default());
        }
        let text = fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }
}

/// Settings for talking to the remote task API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub api_key_header: String,
    pub timeout: Duration,
}

/// Fully resolved settings.
#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub log_file: PathBuf,
    pub log_level: String,
}

impl Config {
    /// Merge command-line values over the config file over defaults.
    pub fn resolve(args: &GlobalArgs, home: &Path) -> Result<Self> {
        let path = args
            .config
            .clone()
            .unwrap_or_else(|| home.join("config.toml"));
        let file = FileConfig::load(&path)?;
        Self::merge(args, file, home)
    }

    fn merge(args: &GlobalArgs, file: FileConfig, home: &Path) -> Result<Self> {
        let base_url = args
            .api_url
            .clone()
            .or(file.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let base_url = base_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(Error::Config(format!("api_url must be an http(s) URL, got '{base_url}'")));
        }

        let api_key = args
            .api_key
            .clone()
            .or(file.api_key)
            .filter(|k| !k.trim().is_empty());

        let timeout_secs = file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be greater than zero".into()));
        }

        Ok(Config {
            api: ApiConfig {
                base_url,
                api_key,
                api_key_header: file
                    .api_key_header
                    .unwrap_or_else(|| DEFAULT_API_KEY_HEADER.to_string()),
                timeout: Duration::from_secs(timeout_secs),
            },
            log_file: args
                .log_file
                .clone()
                .or(file.log_file)
                .unwrap_or_else(|| home.join("taskboard.log")),
            log_level: args
                .log_level
                .clone()
                .or(file.log_level)
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        })
    }
}

/// The per-user directory holding the config file and log, created on demand.
pub fn taskboard_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    let dir = PathBuf::from(home).join(".taskboard");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}
