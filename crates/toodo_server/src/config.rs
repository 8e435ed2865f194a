//! Command-line and environment configuration.

use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;
use toodo_core::SyncMode;

/// Runtime configuration for the `toodo` binary.
#[derive(Debug, Clone, Parser)]
#[command(name = "toodo", version, about = "Todo list HTTP service")]
pub struct ServerConfig {
    /// Socket address to listen on.
    #[arg(long, env = "TOODO_LISTEN", default_value = "0.0.0.0:8000")]
    pub listen: SocketAddr,

    /// SQLite database file; created when missing.
    #[arg(long, env = "TOODO_DB_PATH", default_value = "toodo.sqlite3")]
    pub db_path: PathBuf,

    /// Directory served under `/ui`.
    #[arg(long, env = "TOODO_UI_DIR", default_value = "/ui")]
    pub ui_dir: PathBuf,

    /// How `POST /toodo` applies a non-empty list.
    #[arg(long, env = "TOODO_SYNC_MODE", value_enum, default_value_t = SyncModeArg::Reconcile)]
    pub sync_mode: SyncModeArg,

    /// trace|debug|info|warn|error. Defaults to the build-mode level.
    #[arg(long, env = "TOODO_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rotating log files. Logs go to stderr when unset.
    #[arg(long, env = "TOODO_LOG_DIR")]
    pub log_dir: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SyncModeArg {
    Reconcile,
    Append,
}

impl From<SyncModeArg> for SyncMode {
    fn from(value: SyncModeArg) -> Self {
        match value {
            SyncModeArg::Reconcile => Self::Reconcile,
            SyncModeArg::Append => Self::Append,
        }
    }
}

impl ServerConfig {
    pub fn sync_mode(&self) -> SyncMode {
        self.sync_mode.into()
    }

    /// Explicit level, or the core default for this build.
    pub fn effective_log_level(&self) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| toodo_core::default_log_level().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{ServerConfig, SyncModeArg};
    use clap::Parser;
    use toodo_core::SyncMode;

    #[test]
    fn flags_override_defaults() {
        let config = ServerConfig::try_parse_from([
            "toodo",
            "--listen",
            "127.0.0.1:9000",
            "--db-path",
            "/tmp/t.sqlite3",
            "--ui-dir",
            "./ui",
            "--sync-mode",
            "append",
            "--log-level",
            "warn",
        ])
        .unwrap();

        assert_eq!(config.listen.port(), 9000);
        assert_eq!(config.db_path.to_str(), Some("/tmp/t.sqlite3"));
        assert_eq!(config.ui_dir.to_str(), Some("./ui"));
        assert_eq!(config.sync_mode, SyncModeArg::Append);
        assert_eq!(config.sync_mode(), SyncMode::Append);
        assert_eq!(config.effective_log_level(), "warn");
    }

    #[test]
    fn rejects_unknown_sync_mode_and_bad_address() {
        assert!(ServerConfig::try_parse_from(["toodo", "--sync-mode", "merge"]).is_err());
        assert!(ServerConfig::try_parse_from(["toodo", "--listen", "not-an-addr"]).is_err());
    }
}
