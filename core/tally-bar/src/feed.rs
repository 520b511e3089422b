//! Change feed adapter over OS file notifications.
//!
//! Wraps the platform notification backend in the blocking-iterator shape
//! the watcher expects. The notify handle lives inside the stream, so the
//! subscription stays open exactly as long as the watcher keeps iterating.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tally_core::watch::{ChangeEvent, ChangeFeed, ChangeKind, ChangeStream};
use tally_core::{Result, TallyError};

/// Change feed backed by the recommended platform watcher.
pub struct NotifyFeed;

impl ChangeFeed for NotifyFeed {
    fn subscribe(self: Box<Self>, root: &Path) -> Result<ChangeStream> {
        let (tx, rx) = mpsc::channel();

        let mut watcher =
            notify::recommended_watcher(move |res: notify::Result<Event>| {
                let _ = tx.send(res);
            })
            .map_err(|err| TallyError::Feed(err.to_string()))?;

        watcher
            .watch(root, RecursiveMode::Recursive)
            .map_err(|err| TallyError::Feed(err.to_string()))?;

        Ok(Box::new(NotifyStream {
            _watcher: watcher,
            rx,
            root: root.to_path_buf(),
            pending: VecDeque::new(),
        }))
    }
}

struct NotifyStream {
    // Dropping the handle cancels the subscription; hold it for the
    // stream's lifetime.
    _watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
    root: PathBuf,
    pending: VecDeque<ChangeEvent>,
}

impl Iterator for NotifyStream {
    type Item = Result<ChangeEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(Ok(event));
            }

            match self.rx.recv() {
                Ok(Ok(event)) => {
                    if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                        self.pending.extend(event.paths.iter().map(|path| ChangeEvent {
                            kind: classify(&self.root, path),
                            path: Some(path.clone()),
                        }));
                    }
                }
                Ok(Err(err)) => return Some(Err(TallyError::Feed(err.to_string()))),
                // Backend disconnected: end of stream.
                Err(mpsc::RecvError) => return None,
            }
        }
    }
}

/// Maps a changed path to the part of the data root it belongs to.
fn classify(root: &Path, path: &Path) -> ChangeKind {
    let relative = match path.strip_prefix(root) {
        Ok(relative) => relative,
        Err(_) => return ChangeKind::Other,
    };

    if relative.starts_with("logs") && path.extension().is_some_and(|ext| ext == "json") {
        ChangeKind::LogChanged
    } else if relative.starts_with("plans") {
        ChangeKind::PlanChanged
    } else {
        ChangeKind::Other
    }
}
