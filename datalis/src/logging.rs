use anyhow::Result;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing with file-based logging
/// Logs are written to ~/.config/datalis/logs/datalis-YYYY-MM-DD-HH-MM-SS.log
///
/// The terminal belongs to the chat prompt, so nothing is logged to stdout.
pub fn init_logging() -> Result<PathBuf> {
    // Logs live next to the rest of the app's config
    let config_dir = dirs::config_dir().ok_or(anyhow::anyhow!("Could not find config directory"))?;
    let (logs_dir, log_filename) = log_location(&config_dir, Local::now());
    std::fs::create_dir_all(&logs_dir)?;
    let log_path = logs_dir.join(&log_filename);

    // One file per run, written off the prompt's thread
    let file_appender = tracing_appender::rolling::never(&logs_dir, &log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Plain text with enough context to trace a session back to its task
    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false) // Escape codes would end up in the file
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true);

    // INFO unless RUST_LOG says otherwise
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Install as the global subscriber
    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();

    // The writer thread must outlive every log call, so the guard is leaked
    std::mem::forget(guard);

    Ok(log_path)
}

/// Directory and file name for a run started at `started`.
fn log_location(config_dir: &Path, started: DateTime<Local>) -> (PathBuf, String) {
    let logs_dir = config_dir.join("datalis").join("logs");
    let log_filename = format!("datalis-{}.log", started.format("%Y-%m-%d-%H-%M-%S"));
    (logs_dir, log_filename)
}
