//! Logging setup.
//!
//! Events go to the console and are appended to a log file, one line each
//! with timestamp, level, target and message.

use crate::error::{Result, ShellError};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber.
///
/// The returned guard flushes the file writer when dropped, so it has to be
/// held for as long as the process logs.
///
/// # Errors
///
/// Returns an error if the log directory cannot be created or a global
/// subscriber is already installed.
pub fn init(log_path: &str) -> Result<WorkerGuard> {
    let (directory, file_name) = split_log_path(log_path)?;
    std::fs::create_dir_all(&directory)?;

    // rolling::never appends to a single file
    let file_appender = tracing_appender::rolling::never(&directory, &file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,serenity=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_target(true)
                .with_ansi(false),
        )
        .try_init()
        .map_err(|e| ShellError::Config(format!("Failed to install logger: {}", e)))?;

    Ok(guard)
}

fn split_log_path(log_path: &str) -> Result<(PathBuf, OsString)> {
    let path = Path::new(log_path);
    let file_name = path
        .file_name()
        .ok_or_else(|| ShellError::Config(format!("LOG_PATH has no file name: '{}'", log_path)))?;

    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    Ok((directory, file_name.to_os_string()))
}
