//! Storage configuration and path management for Tally.
//!
//! This module provides a centralized `StorageConfig` struct that manages all
//! file paths under the Tally data root. This abstraction enables:
//!
//! - Easy path changes without hunting through code
//! - Testability via dependency injection (inject temp roots)
//!
//! ## Design Principles
//!
//! - **Single source of truth**: All path decisions centralized here
//! - **Testable**: `StorageConfig::with_root()` enables test injection

use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Central configuration for all Tally storage paths.
///
/// Production code uses `StorageConfig::default()` which points to `~/.tally`.
/// Tests use `StorageConfig::with_root(temp_dir)` for isolation.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Root directory for all Tally data (default: ~/.tally)
    root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let home = dirs::home_dir().expect("Could not find home directory");
        Self {
            root: home.join(".tally"),
        }
    }
}

impl StorageConfig {
    /// Creates a StorageConfig with a custom root directory.
    /// Used for testing with temp directories.
    pub fn with_root(root: PathBuf) -> Self {
        Self { root }
    }

    /// Returns the root directory for Tally data.
    ///
    /// This is the directory the change watcher observes.
    pub fn root(&self) -> &Path {
        &self.root
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Global Files
    // ─────────────────────────────────────────────────────────────────────────────

    /// Path to config.json (shell preferences).
    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.json")
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Directories
    // ─────────────────────────────────────────────────────────────────────────────

    /// Path to logs/ directory (per-day session logs, externally owned).
    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    /// Path to plans/ directory (planning data; watched but never read here).
    pub fn plans_dir(&self) -> PathBuf {
        self.root.join("plans")
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Per-Day Paths
    // ─────────────────────────────────────────────────────────────────────────────

    /// Path to a single day's log file.
    /// Example: ~/.tally/logs/2026-08-06.json
    pub fn log_file(&self, day: NaiveDate) -> PathBuf {
        self.logs_dir().join(format!("{day}.json"))
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Directory Creation
    // ─────────────────────────────────────────────────────────────────────────────

    /// Ensures the root directory and standard subdirectories exist.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }
}
