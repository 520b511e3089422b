//! Configuration loading for the Tally shell.
//!
//! The config file is optional; a missing or malformed file yields the
//! defaults rather than an error.

use crate::storage::StorageConfig;
use fs_err as fs;
use serde::{Deserialize, Serialize};

/// Default tick cadence for the update poller.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Default bound on waiting for the watcher thread at shutdown.
pub const DEFAULT_SHUTDOWN_TIMEOUT_MS: u64 = 1_000;

/// Shell preferences, persisted at `<root>/config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Tick interval for the update poller, in milliseconds.
    pub poll_interval_ms: u64,
    /// How long shutdown waits for the watcher thread before abandoning it.
    pub shutdown_timeout_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            shutdown_timeout_ms: DEFAULT_SHUTDOWN_TIMEOUT_MS,
        }
    }
}

/// Loads the shell configuration, returning defaults if the file is missing
/// or unreadable.
pub fn load_config(storage: &StorageConfig) -> AppConfig {
    fs::read_to_string(storage.config_file())
        .ok()
        .and_then(|c| serde_json::from_str(&c).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let storage = StorageConfig::with_root(temp.path().to_path_buf());

        let config = load_config(&storage);

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_malformed_config_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let storage = StorageConfig::with_root(temp.path().to_path_buf());
        std::fs::write(storage.config_file(), "not json").unwrap();

        let config = load_config(&storage);

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_config_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        let storage = StorageConfig::with_root(temp.path().to_path_buf());
        std::fs::write(storage.config_file(), r#"{"poll_interval_ms": 250}"#).unwrap();

        let config = load_config(&storage);

        assert_eq!(config.poll_interval_ms, 250);
        assert_eq!(config.shutdown_timeout_ms, DEFAULT_SHUTDOWN_TIMEOUT_MS);
    }
}
