//! Error types shared across the simulator.

use std::io;
use std::path::PathBuf;

/// Errors returned by the simulation controller.
///
/// Physics is total over the accepted parameter ranges, so the only failures
/// are rejected inputs.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum SimError {
    /// A parameter change or start was requested while the loop is running.
    ///
    /// # Recovery
    ///
    /// Pause or reset the simulation first.
    #[error("simulation is running; pause or reset before changing it")]
    Busy,

    /// Mass outside `0.1..=10` kg.
    #[error("mass {0} kg is outside the accepted range 0.1..=10")]
    MassOutOfRange(f64),

    /// Angle outside `0..=30` degrees.
    #[error("angle {0}° is outside the accepted range 0..=30")]
    AngleOutOfRange(f64),
}

/// Errors raised while installing the tracing subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// The log file could not be opened for appending.
    #[error("failed to open log file {path}: {source}")]
    OpenLogFile {
        /// Path that was requested.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A global subscriber was already installed.
    #[error("failed to install tracing subscriber: {0}")]
    Install(String),
}
