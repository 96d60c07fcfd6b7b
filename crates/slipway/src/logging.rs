//! Tracing subscriber setup.
//!
//! `RUST_LOG` takes precedence over the configured verbosity. Logs go to the
//! configured log file when there is one; otherwise headless commands log to
//! stderr and the interactive simulator does not log at all, since stderr
//! shares the terminal with the view.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::cli::LogLevel;
use crate::config::Config;
use crate::error::LoggingError;

/// Where logs may go when no log file is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// Fall back to stderr.
    Stderr,
    /// Log only to the configured file, or nowhere.
    FileOnly,
}

/// Builds the filter for `config`, preferring `RUST_LOG` when it is set.
pub fn filter_for(config: &Config) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(LogLevel::from_verbosity(config.verbosity).as_directive()))
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns [`LoggingError::OpenLogFile`] if the log file cannot be opened and
/// [`LoggingError::Install`] if a subscriber is already installed.
pub fn init(config: &Config, target: LogTarget) -> Result<(), LoggingError> {
    let filter = filter_for(config);

    match (&config.log_file, target) {
        (Some(path), _) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| LoggingError::OpenLogFile {
                    path: path.clone(),
                    source,
                })?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|e| LoggingError::Install(e.to_string()))
        }
        (None, LogTarget::Stderr) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| LoggingError::Install(e.to_string())),
        (None, LogTarget::FileOnly) => Ok(()),
    }
}
