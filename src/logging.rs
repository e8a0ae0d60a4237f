//! Log sink construction.
//!
//! The subscriber is built from [`LoggingConfig`] and handed back to the
//! caller, which decides whether to install it globally ([`init`]) or for a
//! scope (`tracing::subscriber::with_default`).

use crate::config::LoggingConfig;
use crate::error::{PdfTextError, Result};
use std::fs;
use std::path::Path;
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub type BoxedSubscriber = Box<dyn Subscriber + Send + Sync + 'static>;

/// Keeps the file writer alive; dropping it flushes buffered lines.
#[must_use = "dropping the guard stops file logging"]
pub struct LogGuard {
    _worker: Option<WorkerGuard>,
}

pub fn build_subscriber(config: &LoggingConfig) -> Result<(BoxedSubscriber, LogGuard)> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| PdfTextError::Config {
            message: format!("invalid log level '{}': {}", config.log_level, e),
        })?;

    match config.log_path {
        Some(ref log_path) => {
            let (directory, file_name) = split_log_path(log_path)?;
            fs::create_dir_all(&directory)?;

            let appender = tracing_appender::rolling::never(&directory, file_name);
            let (writer, worker) = tracing_appender::non_blocking(appender);

            let subscriber = tracing_subscriber::fmt()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false)
                .with_env_filter(filter)
                .finish();

            Ok((
                Box::new(subscriber),
                LogGuard {
                    _worker: Some(worker),
                },
            ))
        }
        None => {
            let subscriber = tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_env_filter(filter)
                .finish();

            Ok((Box::new(subscriber), LogGuard { _worker: None }))
        }
    }
}

/// Installs the configured sink as the process-wide default.
pub fn init(config: &LoggingConfig) -> Result<LogGuard> {
    let (subscriber, guard) = build_subscriber(config)?;
    tracing::subscriber::set_global_default(subscriber).map_err(|e| PdfTextError::Config {
        message: format!("failed to install logger: {}", e),
    })?;
    Ok(guard)
}

fn split_log_path(log_path: &Path) -> Result<(std::path::PathBuf, std::ffi::OsString)> {
    let file_name = log_path
        .file_name()
        .ok_or_else(|| PdfTextError::Config {
            message: format!("log_path has no file name: {}", log_path.display()),
        })?
        .to_os_string();

    let directory = match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::path::PathBuf::from("."),
    };

    Ok((directory, file_name))
}
