//! Logging setup
//!
//! All diagnostics go through `tracing`. The CLI writes to a daily-rotated
//! file under `$XDG_STATE_HOME/logmend/` so analysis output on stdout stays
//! clean. `RUST_LOG` overrides the configured level when set.

use crate::config::{Config, LoggingConfig};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

/// Keeps the background log writer alive; dropping it flushes pending writes.
pub struct LoggingGuard {
    _guard: WorkerGuard,
}

/// Initialize file logging for the process.
///
/// Fails only when the state directory cannot be created. The global
/// subscriber can be set once per process, so binaries call this exactly
/// once at startup.
pub fn init(config: &LoggingConfig) -> crate::error::Result<LoggingGuard> {
    let log_dir = Config::state_dir();
    std::fs::create_dir_all(&log_dir)?;

    let appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "logmend.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .init();

    tracing::info!(dir = %log_dir.display(), level = %config.level, "logging started");

    Ok(LoggingGuard { _guard: guard })
}

/// Test logging: stdout, captured per test, `RUST_LOG`-controlled.
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Where [`init`] writes its output.
pub fn log_file_path() -> PathBuf {
    Config::log_path()
}
