//! Service configuration.
//!
//! Values come from a TOML file when one is given, otherwise from the process
//! environment (with `.env` support). CLI flags are applied on top by `main`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory polled for new entries
    pub watch_dir: PathBuf,

    /// Root that receives the replicated entries
    pub backup_dir: PathBuf,

    pub host: String,
    pub port: u16,

    /// Delay between two listings of `watch_dir`
    pub poll_interval_ms: u64,

    /// Upper bound for a single notification send to one observer
    pub observer_send_timeout_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            watch_dir: default_watch_dir(),
            backup_dir: PathBuf::from("./TrashBackup"),
            host: "0.0.0.0".into(),
            port: 8080,
            poll_interval_ms: 1000,
            observer_send_timeout_ms: 5000,
            log_level: "info".into(),
        }
    }
}

fn default_watch_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".Trash")
}

impl AppConfig {
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let defaults = Self::default();

        Self {
            watch_dir: std::env::var_os("WATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.watch_dir),
            backup_dir: std::env::var_os("BACKUP_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.backup_dir),
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            poll_interval_ms: std::env::var("POLL_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.poll_interval_ms),
            observer_send_timeout_ms: std::env::var("OBSERVER_SEND_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.observer_send_timeout_ms),
            log_level: std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
        }
    }

    /// Load configuration from a TOML file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn observer_send_timeout(&self) -> Duration {
        Duration::from_millis(self.observer_send_timeout_ms)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
