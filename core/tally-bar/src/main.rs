//! Tally status-bar shell.
//!
//! Thin glue around tally-core: resolve paths, initialize logging, wire the
//! production feed/store/presenter into the controller, and run the
//! UI-thread tick loop. Everything with behavior worth testing lives in the
//! core crate.

mod feed;
mod presenter;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::sleep;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tally_core::config::{self, AppConfig};
use tally_core::{Controller, LogStore, StorageConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use feed::NotifyFeed;
use presenter::StatusLinePresenter;

const LOG_FILE_NAME: &str = "tally-bar.log";

#[derive(Parser)]
#[command(
    name = "tally-bar",
    about = "Status-bar indicator for tracked work sessions",
    version
)]
struct Cli {
    /// Data root directory (default: ~/.tally)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Tick interval for the update poller, in milliseconds
    #[arg(long, global = true)]
    poll_interval_ms: Option<u64>,

    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Watch the log store and emit a title line on every change (default)
    Run,
    /// Print the current title once and exit
    Status,
    /// Stop the active session, then print the resulting title
    Stop,
}

fn main() {
    let cli = Cli::parse();

    let storage = match cli.root {
        Some(root) => StorageConfig::with_root(root),
        None => StorageConfig::default(),
    };
    let _log_guard = init_logging(&storage);

    let mut app_config = config::load_config(&storage);
    if let Some(poll_interval_ms) = cli.poll_interval_ms {
        app_config.poll_interval_ms = poll_interval_ms;
    }

    let mut controller = Controller::new(
        LogStore::new(storage.clone()),
        StatusLinePresenter,
        storage.root().to_path_buf(),
        Duration::from_millis(app_config.shutdown_timeout_ms),
    );

    match cli.command.unwrap_or(CliCommand::Run) {
        CliCommand::Run => run_loop(&mut controller, &app_config),
        CliCommand::Status => controller.on_refresh(),
        CliCommand::Stop => controller.on_stop(),
    }
}

/// The UI-thread loop: tick on a fixed cadence until a signal asks us to
/// quit, then shut the pipeline down in order.
fn run_loop(controller: &mut Controller<LogStore, StatusLinePresenter>, app_config: &AppConfig) {
    let quit = Arc::new(AtomicBool::new(false));
    let quit_flag = Arc::clone(&quit);
    if let Err(err) = ctrlc::set_handler(move || quit_flag.store(true, Ordering::Relaxed)) {
        warn!(error = %err, "Failed to install signal handler");
    }

    controller.start(Box::new(NotifyFeed));

    let tick = Duration::from_millis(app_config.poll_interval_ms.max(1));
    while !quit.load(Ordering::Relaxed) {
        sleep(tick);
        controller.on_tick();
    }

    info!("Shutdown requested");
    controller.on_quit();
}

/// Logging goes to a file under the data root; stdout stays reserved for
/// title lines.
fn init_logging(storage: &StorageConfig) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    if let Err(err) = storage.ensure_dirs() {
        eprintln!("Could not prepare data root: {err}");
        return None;
    }

    let appender = tracing_appender::rolling::never(storage.root(), LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tally_core=info,tally_bar=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Some(guard)
}
