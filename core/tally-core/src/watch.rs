//! Background watcher over the change feed.
//!
//! The watcher runs on a dedicated thread, blocking on the feed iterator
//! between events. It forwards log changes to the relay as opaque update
//! requests and drops every other event kind. Shutdown is cooperative: the
//! running flag is checked once per received event, so stopping waits at
//! most until the next event (or the join timeout, whichever comes first).

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, info};

use crate::error::Result;
use crate::relay::{RelayMessage, RelaySender};

/// What part of the tracked data changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// A day log mutated; the title may be stale.
    LogChanged,
    /// Planning data mutated; irrelevant to the title.
    PlanChanged,
    /// Anything else under the data root.
    Other,
}

/// A single change notification from the feed.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub path: Option<PathBuf>,
}

/// Blocking, lazy, non-restartable stream of change events.
pub type ChangeStream = Box<dyn Iterator<Item = Result<ChangeEvent>> + Send>;

/// External change-notification source.
pub trait ChangeFeed: Send {
    /// Opens a subscription rooted at `root`.
    ///
    /// The returned stream blocks between events and ends when the
    /// underlying source disconnects.
    fn subscribe(self: Box<Self>, root: &Path) -> Result<ChangeStream>;
}

/// Handle to the background watcher thread.
pub struct WatcherHandle {
    thread: Option<JoinHandle<()>>,
    finished_rx: Receiver<()>,
}

impl WatcherHandle {
    /// Waits for the watcher thread to finish, bounded by `timeout`.
    ///
    /// Returns `true` if the thread exited in time. On timeout the thread is
    /// abandoned: it stays blocked on the feed until the next event, then
    /// sees the cleared flag and exits on its own.
    pub fn join_timeout(mut self, timeout: Duration) -> bool {
        match self.finished_rx.recv_timeout(timeout) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                if let Some(thread) = self.thread.take() {
                    let _ = thread.join();
                }
                true
            }
            Err(RecvTimeoutError::Timeout) => false,
        }
    }
}

/// Spawns the watcher thread.
///
/// The loop pushes one relay message per `LogChanged` event and exits when
/// `running` is cleared, the feed ends, or the feed errors.
pub fn spawn_watcher(
    feed: Box<dyn ChangeFeed>,
    root: PathBuf,
    relay: RelaySender,
    running: Arc<AtomicBool>,
) -> WatcherHandle {
    let (finished_tx, finished_rx) = mpsc::channel();
    let thread = thread::spawn(move || {
        watch_loop(feed, &root, &relay, &running);
        let _ = finished_tx.send(());
    });
    WatcherHandle {
        thread: Some(thread),
        finished_rx,
    }
}

fn watch_loop(
    feed: Box<dyn ChangeFeed>,
    root: &Path,
    relay: &RelaySender,
    running: &AtomicBool,
) {
    let stream = match feed.subscribe(root) {
        Ok(stream) => stream,
        Err(err) => {
            error!(error = %err, root = %root.display(), "Failed to subscribe to change feed");
            return;
        }
    };

    info!(root = %root.display(), "Watching for log changes");

    for event in stream {
        if !running.load(Ordering::Relaxed) {
            break;
        }

        match event {
            Ok(event) => {
                if event.kind == ChangeKind::LogChanged {
                    debug!(path = ?event.path, "Log change detected");
                    relay.push(RelayMessage);
                }
            }
            Err(err) => {
                // Fail-stop: the title goes stale rather than retrying.
                error!(error = %err, "Change feed error; watcher exiting");
                return;
            }
        }
    }

    debug!("Watcher loop finished");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TallyError;
    use crate::relay::EventRelay;

    /// Feed backed by a fixed script of events; ends after the last one.
    struct ScriptedFeed {
        events: Vec<Result<ChangeEvent>>,
    }

    impl ChangeFeed for ScriptedFeed {
        fn subscribe(self: Box<Self>, _root: &Path) -> Result<ChangeStream> {
            Ok(Box::new(self.events.into_iter()))
        }
    }

    /// Feed whose subscription fails outright.
    struct BrokenFeed;

    impl ChangeFeed for BrokenFeed {
        fn subscribe(self: Box<Self>, _root: &Path) -> Result<ChangeStream> {
            Err(TallyError::Feed("backend unavailable".to_string()))
        }
    }

    fn event(kind: ChangeKind) -> Result<ChangeEvent> {
        Ok(ChangeEvent { kind, path: None })
    }

    fn run_to_completion(events: Vec<Result<ChangeEvent>>) -> Vec<RelayMessage> {
        let relay = EventRelay::new();
        let running = Arc::new(AtomicBool::new(true));
        let handle = spawn_watcher(
            Box::new(ScriptedFeed { events }),
            PathBuf::from("/nonexistent"),
            relay.sender(),
            running,
        );
        assert!(handle.join_timeout(Duration::from_secs(5)));
        relay.drain_all()
    }

    #[test]
    fn test_log_changes_always_push() {
        let drained = run_to_completion(vec![
            event(ChangeKind::LogChanged),
            event(ChangeKind::LogChanged),
            event(ChangeKind::LogChanged),
        ]);
        assert_eq!(drained.len(), 3);
    }

    #[test]
    fn test_plan_changes_never_push() {
        let drained = run_to_completion(vec![
            event(ChangeKind::PlanChanged),
            event(ChangeKind::Other),
            event(ChangeKind::PlanChanged),
        ]);
        assert!(drained.is_empty());
    }

    #[test]
    fn test_mixed_kinds_push_only_log_changes() {
        let drained = run_to_completion(vec![
            event(ChangeKind::PlanChanged),
            event(ChangeKind::LogChanged),
            event(ChangeKind::Other),
            event(ChangeKind::LogChanged),
        ]);
        assert_eq!(drained.len(), 2);
    }

    #[test]
    fn test_feed_error_stops_loop_without_panic() {
        let drained = run_to_completion(vec![
            event(ChangeKind::LogChanged),
            Err(TallyError::Feed("transport broke".to_string())),
            event(ChangeKind::LogChanged),
        ]);
        // The event after the error is never observed.
        assert_eq!(drained.len(), 1);
    }

    #[test]
    fn test_failed_subscription_exits_cleanly() {
        let relay = EventRelay::new();
        let running = Arc::new(AtomicBool::new(true));
        let handle = spawn_watcher(
            Box::new(BrokenFeed),
            PathBuf::from("/nonexistent"),
            relay.sender(),
            running,
        );
        assert!(handle.join_timeout(Duration::from_secs(5)));
        assert!(relay.drain_all().is_empty());
    }

    #[test]
    fn test_cleared_flag_stops_before_processing() {
        let relay = EventRelay::new();
        let running = Arc::new(AtomicBool::new(false));
        let handle = spawn_watcher(
            Box::new(ScriptedFeed {
                events: vec![event(ChangeKind::LogChanged)],
            }),
            PathBuf::from("/nonexistent"),
            relay.sender(),
            running,
        );
        assert!(handle.join_timeout(Duration::from_secs(5)));
        assert!(relay.drain_all().is_empty());
    }

    #[test]
    fn test_join_timeout_reports_stuck_watcher() {
        struct BlockingFeed {
            rx: mpsc::Receiver<Result<ChangeEvent>>,
        }

        impl ChangeFeed for BlockingFeed {
            fn subscribe(self: Box<Self>, _root: &Path) -> Result<ChangeStream> {
                Ok(Box::new(self.rx.into_iter()))
            }
        }

        let (tx, rx) = mpsc::channel();
        let relay = EventRelay::new();
        let running = Arc::new(AtomicBool::new(true));
        let handle = spawn_watcher(
            Box::new(BlockingFeed { rx }),
            PathBuf::from("/nonexistent"),
            relay.sender(),
            Arc::clone(&running),
        );

        running.store(false, Ordering::Relaxed);
        assert!(!handle.join_timeout(Duration::from_millis(50)));

        // Unblock the abandoned thread so the test process exits promptly.
        drop(tx);
    }
}
