//! Error types for tally-core operations.

use std::path::PathBuf;

/// All errors that can occur in tally-core operations.
#[derive(Debug, thiserror::Error)]
pub enum TallyError {
    // ─────────────────────────────────────────────────────────────────────
    // Store Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Day log malformed: {path}: {details}")]
    LogMalformed { path: PathBuf, details: String },

    #[error("No active session")]
    NoActiveSession,

    // ─────────────────────────────────────────────────────────────────────
    // Feed Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Change feed error: {0}")]
    Feed(String),

    // ─────────────────────────────────────────────────────────────────────
    // I/O Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results using TallyError.
pub type Result<T> = std::result::Result<T, TallyError>;
