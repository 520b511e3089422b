//! File-backed session store over per-day JSON logs.
//!
//! The log format is owned by the tracker that writes it; this store only
//! reads the day's file and stamps `ended_at` when asked to stop. A missing
//! file means "no session yet today" and is not an error; a file that exists
//! but does not parse is.

use chrono::{DateTime, NaiveDate, Utc};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TallyError};
use crate::session::{SessionSnapshot, SessionStore, StoppedSession};
use crate::storage::StorageConfig;

/// One tracked work interval in a day log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

/// A single day's log file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DayLog {
    #[serde(default)]
    pub sessions: Vec<LogEntry>,
}

impl DayLog {
    /// The active session is the last entry that has not ended.
    fn active_entry(&self) -> Option<&LogEntry> {
        self.sessions.iter().rev().find(|e| e.ended_at.is_none())
    }
}

/// Session store reading and writing day logs under the data root.
#[derive(Debug, Clone)]
pub struct LogStore {
    storage: StorageConfig,
}

impl LogStore {
    pub fn new(storage: StorageConfig) -> Self {
        Self { storage }
    }

    fn load_day(&self, day: NaiveDate) -> Result<Option<DayLog>> {
        let path = self.storage.log_file(day);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(|source| TallyError::Io {
            context: format!("reading day log {}", path.display()),
            source,
        })?;
        let log = serde_json::from_str(&content).map_err(|source| TallyError::LogMalformed {
            path: path.clone(),
            details: source.to_string(),
        })?;
        Ok(Some(log))
    }

    fn save_day(&self, day: NaiveDate, log: &DayLog) -> Result<()> {
        let path = self.storage.log_file(day);
        let content = serde_json::to_string_pretty(log).map_err(|source| TallyError::Json {
            context: "serializing day log".to_string(),
            source,
        })?;
        fs::write(&path, content).map_err(|source| TallyError::Io {
            context: format!("writing day log {}", path.display()),
            source,
        })
    }
}

/// Builds a snapshot for an open entry as of `now`.
///
/// A clock that reads before `started_at` floors elapsed at zero instead of
/// underflowing.
fn snapshot_at(entry: &LogEntry, now: DateTime<Utc>) -> SessionSnapshot {
    let elapsed_ms = (now - entry.started_at).num_milliseconds().max(0) as u64;
    SessionSnapshot {
        alias: entry.alias.clone(),
        elapsed_ms: Some(elapsed_ms),
    }
}

impl SessionStore for LogStore {
    fn active_session(&self, day: NaiveDate) -> Result<Option<SessionSnapshot>> {
        let log = match self.load_day(day)? {
            Some(log) => log,
            None => return Ok(None),
        };
        Ok(log.active_entry().map(|entry| snapshot_at(entry, Utc::now())))
    }

    fn stop_current_session(&self, day: NaiveDate) -> Result<StoppedSession> {
        let mut log = self.load_day(day)?.ok_or(TallyError::NoActiveSession)?;
        let entry = log
            .sessions
            .iter_mut()
            .rev()
            .find(|e| e.ended_at.is_none())
            .ok_or(TallyError::NoActiveSession)?;

        entry.ended_at = Some(Utc::now());
        let alias = entry.alias.clone();
        self.save_day(day, &log)?;

        debug!(day = %day, alias = ?alias, "Stopped active session");
        Ok(StoppedSession { alias })
    }
}
