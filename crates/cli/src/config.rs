//! Command-line / environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use stockctl_observability::LogFormat;

/// Terminal inventory manager backed by a local SQLite file.
#[derive(Debug, Clone, Parser)]
#[command(name = "stockctl", version, about)]
pub struct Config {
    /// Path of the SQLite database file (created if missing).
    #[arg(long, env = "STOCKCTL_DATABASE", default_value = "stock.db")]
    pub database: PathBuf,

    /// Log output format: `pretty` or `json`. Level comes from RUST_LOG.
    #[arg(long, env = "STOCKCTL_LOG_FORMAT", default_value = "pretty")]
    pub log_format: LogFormat,

    /// Milliseconds to wait on a database lock held by another process.
    #[arg(long, env = "STOCKCTL_BUSY_TIMEOUT_MS", default_value_t = 5000)]
    pub busy_timeout_ms: u64,
}

impl Config {
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}
