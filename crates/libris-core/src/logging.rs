//! Tracing subscriber setup.
//!
//! The embedding application calls [`init`] once at start-up and keeps the
//! returned guard alive for the process lifetime so buffered log lines are
//! flushed on exit.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{LogConfig, paths};

/// Log file prefix; the appender adds a date suffix.
const LOG_FILE_PREFIX: &str = "libris.log";

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over the configured level. When `config.file` is set, logs
/// go to a daily-rolling file in `<home>/logs/`, otherwise to stderr.
/// Calling this twice is harmless; the second call leaves the first
/// subscriber in place and returns `None`.
///
/// # Errors
/// Returns an error if the log directory cannot be created or the filter
/// directive is invalid.
pub fn init(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    init_in(config, &paths::logs_dir())
}

/// Same as [`init`] with an explicit log directory.
///
/// # Errors
/// Returns an error if the log directory cannot be created or the filter
/// directive is invalid.
pub fn init_in(config: &LogConfig, logs_dir: &Path) -> Result<Option<WorkerGuard>> {
    let filter = build_filter(&config.level)?;

    if !config.file {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
        return Ok(None);
    }

    fs::create_dir_all(logs_dir)
        .with_context(|| format!("Failed to create log directory {}", logs_dir.display()))?;

    let appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .is_ok();

    // The writer is unused when another subscriber is already installed.
    Ok(installed.then_some(guard))
}

fn build_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(level).with_context(|| format!("Invalid log level directive: {level}"))
}
