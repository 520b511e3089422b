//! # tally-core
//!
//! Core library for Tally, a status-bar indicator for tracked work sessions.
//! The shell (menu-bar glue, CLI) stays thin; everything with behavior worth
//! testing lives here.
//!
//! ## Design Principles
//!
//! - **One pipeline**: Change Feed → Watcher (filter) → Relay → tick drain →
//!   store query → title render. The relay is the only state shared across
//!   the thread boundary.
//! - **UI-thread discipline**: Only the controller, on the UI-owning thread,
//!   talks to the presenter. The watcher thread never mutates UI state.
//! - **Contained failures**: A store or feed error degrades the title, never
//!   crashes the process.
//! - **Injected collaborators**: Store, feed, and presenter are traits, so
//!   the pipeline runs against fakes in tests.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tally_core::{Controller, LogStore, StorageConfig};
//!
//! let storage = StorageConfig::default();
//! let mut controller = Controller::new(LogStore::new(storage.clone()), presenter, root, timeout);
//! controller.start(Box::new(feed));
//! // then on a timer: controller.on_tick();
//! ```

// Public modules
pub mod config;
pub mod controller;
pub mod error;
pub mod relay;
pub mod session;
pub mod storage;
pub mod store;
pub mod title;
pub mod watch;

// Re-export commonly used items at crate root
pub use config::AppConfig;
pub use controller::{Controller, Phase, Presenter};
pub use error::{Result, TallyError};
pub use relay::{EventRelay, RelayMessage, RelaySender};
pub use session::{query_current, SessionQuery, SessionSnapshot, SessionStore, StoppedSession};
pub use storage::StorageConfig;
pub use store::LogStore;
pub use title::{format_elapsed, render};
pub use watch::{ChangeEvent, ChangeFeed, ChangeKind, ChangeStream, WatcherHandle};
