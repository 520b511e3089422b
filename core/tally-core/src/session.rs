//! Session snapshots and the query facade over the session store.
//!
//! The store itself is an external collaborator behind the [`SessionStore`]
//! trait; this module only defines the read contract and contains store
//! failures so they never reach the title.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::warn;

use crate::error::Result;

/// Alias shown when a session has no alias of its own.
pub const UNKNOWN_ALIAS: &str = "Unknown";

/// Read-only view of the active session at query time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Short display name for the session, if one was recorded.
    pub alias: Option<String>,
    /// Milliseconds since the session started, if the store knows the start.
    pub elapsed_ms: Option<u64>,
}

/// Outcome of asking the store for the active session.
///
/// `Failed` renders the same as `Idle` but stays a distinct branch so tests
/// and logs can tell "nothing open" from "the store could not answer".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionQuery {
    /// A session is open.
    Active(SessionSnapshot),
    /// No session is open.
    Idle,
    /// The store query failed; already logged.
    Failed,
}

/// The session ended by `stop_current_session`, for the confirmation banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoppedSession {
    pub alias: Option<String>,
}

impl StoppedSession {
    /// Alias for display, with the placeholder substituted when absent.
    pub fn display_alias(&self) -> &str {
        self.alias.as_deref().unwrap_or(UNKNOWN_ALIAS)
    }
}

/// Query interface over the external session log store.
pub trait SessionStore {
    /// Returns the active session for `day`, or `None` when nothing is open.
    fn active_session(&self, day: NaiveDate) -> Result<Option<SessionSnapshot>>;

    /// Ends the active session for `day` and returns what was stopped.
    ///
    /// Returns [`crate::TallyError::NoActiveSession`] when nothing is open.
    fn stop_current_session(&self, day: NaiveDate) -> Result<StoppedSession>;
}

impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    fn active_session(&self, day: NaiveDate) -> Result<Option<SessionSnapshot>> {
        (**self).active_session(day)
    }

    fn stop_current_session(&self, day: NaiveDate) -> Result<StoppedSession> {
        (**self).stop_current_session(day)
    }
}

/// Queries `store` for the active session on `day`, containing any failure.
pub fn query_current<S: SessionStore + ?Sized>(store: &S, day: NaiveDate) -> SessionQuery {
    match store.active_session(day) {
        Ok(Some(snapshot)) => SessionQuery::Active(snapshot),
        Ok(None) => SessionQuery::Idle,
        Err(err) => {
            warn!(error = %err, day = %day, "Session query failed; treating as no session");
            SessionQuery::Failed
        }
    }
}
