//! Lifecycle controller: wires the watcher, relay, store, and presenter.
//!
//! The controller lives on the UI-owning thread and is the only component
//! allowed to call the presenter. The watcher thread touches nothing here
//! except the relay's producer half and the running flag.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tracing::{debug, info, warn};

use crate::relay::EventRelay;
use crate::session::{self, SessionQuery, SessionStore};
use crate::title;
use crate::watch::{spawn_watcher, ChangeFeed, WatcherHandle};

/// Where title updates and notification banners land.
///
/// Implemented by the shell; fakes in tests. Called only from the UI thread.
pub trait Presenter {
    fn set_title(&self, title: &str);
    fn notify(&self, subtitle: &str, message: &str);
}

impl<T: Presenter + ?Sized> Presenter for Arc<T> {
    fn set_title(&self, title: &str) {
        (**self).set_title(title)
    }

    fn notify(&self, subtitle: &str, message: &str) {
        (**self).notify(subtitle, message)
    }
}

/// Lifecycle phase of the controller.
///
/// The stopping sequence runs synchronously inside `on_quit`, so there is no
/// observable intermediate phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Created,
    Running,
    Stopped,
}

/// Owns the update pipeline from watcher to title.
pub struct Controller<S, P> {
    store: S,
    presenter: P,
    relay: EventRelay,
    running: Arc<AtomicBool>,
    watcher: Option<WatcherHandle>,
    phase: Phase,
    root: PathBuf,
    shutdown_timeout: Duration,
}

impl<S: SessionStore, P: Presenter> Controller<S, P> {
    pub fn new(store: S, presenter: P, root: PathBuf, shutdown_timeout: Duration) -> Self {
        Self {
            store,
            presenter,
            relay: EventRelay::new(),
            running: Arc::new(AtomicBool::new(false)),
            watcher: None,
            phase: Phase::Created,
            root,
            shutdown_timeout,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Starts the watcher on `feed` and performs the initial render, so the
    /// title is correct before the first event arrives.
    ///
    /// The caller owns the tick cadence: call `on_tick` on a short fixed
    /// interval from the UI thread.
    pub fn start(&mut self, feed: Box<dyn ChangeFeed>) {
        if self.phase != Phase::Created {
            warn!(phase = ?self.phase, "start ignored outside the created phase");
            return;
        }

        self.running.store(true, Ordering::Relaxed);
        self.watcher = Some(spawn_watcher(
            feed,
            self.root.clone(),
            self.relay.sender(),
            Arc::clone(&self.running),
        ));
        self.phase = Phase::Running;
        self.render();
        info!("Controller running");
    }

    /// Timer callback: drains the relay and re-renders at most once.
    ///
    /// Pending messages are a presence signal, not a counted work queue.
    pub fn on_tick(&self) {
        if self.phase != Phase::Running {
            return;
        }
        if !self.relay.drain_all().is_empty() {
            self.render();
        }
    }

    /// Manual refresh: re-renders immediately, bypassing the relay.
    pub fn on_refresh(&self) {
        if self.phase == Phase::Stopped {
            return;
        }
        self.render();
    }

    /// Ends the active session, re-renders, and surfaces a banner.
    ///
    /// The store's stop is only invoked when a session is actually open, so
    /// a no-op stop never touches the mutation path.
    pub fn on_stop(&self) {
        if self.phase == Phase::Stopped {
            return;
        }

        let today = Local::now().date_naive();
        match session::query_current(&self.store, today) {
            SessionQuery::Active(_) => match self.store.stop_current_session(today) {
                Ok(stopped) => {
                    self.render();
                    self.presenter.notify(
                        "Session stopped",
                        &format!("Stopped: {}", stopped.display_alias()),
                    );
                }
                Err(err) => {
                    warn!(error = %err, "Stop session failed");
                    self.presenter.notify("Failed to stop session", &err.to_string());
                }
            },
            SessionQuery::Idle | SessionQuery::Failed => {
                self.presenter
                    .notify("No active session", "There's no session to stop");
            }
        }
    }

    /// Quit: stops ticking, then waits briefly for the watcher to exit.
    ///
    /// The join is bounded; a watcher still blocked on its feed is abandoned
    /// rather than holding up shutdown.
    pub fn on_quit(&mut self) {
        let was_running = self.phase == Phase::Running;
        self.phase = Phase::Stopped;
        if !was_running {
            return;
        }

        self.running.store(false, Ordering::Relaxed);
        if let Some(watcher) = self.watcher.take() {
            if watcher.join_timeout(self.shutdown_timeout) {
                debug!("Watcher thread stopped");
            } else {
                warn!("Watcher thread did not stop in time; abandoning it");
            }
        }
        info!("Controller stopped");
    }

    /// Returns the title that would be displayed right now.
    pub fn current_title(&self) -> String {
        let today = Local::now().date_naive();
        title::render(&session::query_current(&self.store, today))
    }

    fn render(&self) {
        self.presenter.set_title(&self.current_title());
    }
}
