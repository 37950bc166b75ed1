//! Logging configuration using tracing

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::Result;

/// Filter used when `FTABS_LOG` is not set
pub const DEFAULT_FILTER: &str = "form_tabs=info,warn";

/// Initialize the logging subsystem
///
/// Logs are written to `~/.local/share/form-tabs/logs/`
/// Log level is controlled by `FTABS_LOG` environment variable.
///
/// Stdout is reserved for headless NDJSON output, so nothing is logged there.
///
/// # Examples
/// ```bash
/// FTABS_LOG=debug ftabs fields.json
/// FTABS_LOG=form_tabs_app=trace ftabs fields.json
/// ```
pub fn init() -> Result<()> {
    init_with_default(DEFAULT_FILTER)
}

/// Initialize logging with a fallback filter (e.g. from the `[log]` settings)
pub fn init_with_default(default_filter: &str) -> Result<()> {
    let log_dir = get_log_directory()?;
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "ftabs.log");

    // FTABS_LOG always wins over the configured default
    let env_filter =
        EnvFilter::try_from_env("FTABS_LOG").unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .init();

    tracing::info!("form-tabs starting");
    tracing::info!("Log directory: {}", log_dir.display());

    Ok(())
}

/// Get the log directory path
fn get_log_directory() -> Result<PathBuf> {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    Ok(base.join("form-tabs").join("logs"))
}

/// Get the log file path for the current day
pub fn get_current_log_file() -> Result<PathBuf> {
    let dir = get_log_directory()?;
    Ok(dir.join("ftabs.log"))
}
