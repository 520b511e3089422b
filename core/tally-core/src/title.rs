//! Pure rendering from a session query to the status-bar title.

use crate::session::{SessionQuery, SessionSnapshot, UNKNOWN_ALIAS};

/// Title shown when no session is open.
pub const READY_TITLE: &str = "Ready.";

const MS_PER_HOUR: u64 = 3_600_000;
const MS_PER_MINUTE: u64 = 60_000;

/// Renders the display title for a query outcome.
///
/// A failed query renders like idle; the distinction lives in the query
/// value, not the title.
pub fn render(query: &SessionQuery) -> String {
    match query {
        SessionQuery::Active(snapshot) => render_snapshot(snapshot),
        SessionQuery::Idle | SessionQuery::Failed => READY_TITLE.to_string(),
    }
}

fn render_snapshot(snapshot: &SessionSnapshot) -> String {
    let alias = snapshot.alias.as_deref().unwrap_or(UNKNOWN_ALIAS);
    match snapshot.elapsed_ms {
        Some(elapsed_ms) => format!("{alias} ({})", format_elapsed(elapsed_ms)),
        None => alias.to_string(),
    }
}

/// Formats elapsed milliseconds as `HH:MM`, truncating toward zero.
///
/// Hours keep counting past 24 for all-day sessions (`27:13`); there is no
/// rollover and no seconds component.
pub fn format_elapsed(elapsed_ms: u64) -> String {
    let hours = elapsed_ms / MS_PER_HOUR;
    let minutes = (elapsed_ms % MS_PER_HOUR) / MS_PER_MINUTE;
    format!("{hours:02}:{minutes:02}")
}
