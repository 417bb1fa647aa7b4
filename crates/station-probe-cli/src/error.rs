//! Error types for the CLI
//!
//! Everything here ends the process with the setup exit code; scenario
//! failures are not errors, they are part of the report.

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors raised before or around a suite run
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration, launch or I/O error from the library
    #[error("{0}")]
    Probe(#[from] station_probe::ProbeError),

    /// Tokio runtime could not be built
    #[error("Failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),

    /// Global tracing subscriber could not be installed
    #[error("Failed to initialize logging: {message}")]
    Logging {
        /// Subscriber error
        message: String,
    },

    /// Flag combination the binary cannot honor
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// What was wrong
        message: String,
    },

    /// Report or configuration could not be serialized
    #[error("Failed to render output: {0}")]
    Render(#[from] serde_json::Error),
}

impl CliError {
    /// Create a logging error
    #[must_use]
    pub fn logging(message: impl Into<String>) -> Self {
        Self::Logging {
            message: message.into(),
        }
    }

    /// Create an invalid argument error
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}
