//! Terminal presenter: title lines on stdout, banners via the OS.
//!
//! Each title update is one stdout line, so the binary plugs straight into
//! xbar/waybar-style status consumers. Notifications shell out to the
//! platform notifier and fall back to stderr when none is available.

use std::io::Write;
use std::process::Command;

use tally_core::Presenter;
use tracing::info;

pub struct StatusLinePresenter;

impl Presenter for StatusLinePresenter {
    fn set_title(&self, title: &str) {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        let _ = writeln!(handle, "{title}");
        let _ = handle.flush();
    }

    fn notify(&self, subtitle: &str, message: &str) {
        info!(subtitle, message, "Notification");
        if !send_desktop_notification(subtitle, message) {
            eprintln!("{subtitle}: {message}");
        }
    }
}

#[cfg(target_os = "macos")]
fn send_desktop_notification(subtitle: &str, message: &str) -> bool {
    let script = format!(
        "display notification {} with title \"Tally\" subtitle {}",
        applescript_string(message),
        applescript_string(subtitle)
    );
    Command::new("osascript")
        .arg("-e")
        .arg(script)
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

#[cfg(target_os = "macos")]
fn applescript_string(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(not(target_os = "macos"))]
fn send_desktop_notification(subtitle: &str, message: &str) -> bool {
    Command::new("notify-send")
        .arg(format!("Tally: {subtitle}"))
        .arg(message)
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}
