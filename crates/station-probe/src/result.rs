//! Result and error types for station-probe.

use thiserror::Error;

/// Result type for station-probe operations
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Errors that can occur while driving a scenario
#[derive(Debug, Error)]
pub enum ProbeError {
    /// A locator's readiness predicate stayed false for the whole wait bound
    #[error("Timed out after {timeout_ms}ms waiting for {locator} to be {readiness}")]
    WaitTimeout {
        /// Locator that never became ready
        locator: String,
        /// Readiness predicate that was not met
        readiness: String,
        /// Wait bound in milliseconds
        timeout_ms: u64,
    },

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// An action on a located element failed
    #[error("Could not {action} {locator}: {message}")]
    Element {
        /// Locator of the element
        locator: String,
        /// Action that was attempted
        action: String,
        /// Error message
        message: String,
    },

    /// Screenshot error
    #[error("Screenshot failed: {message}")]
    Screenshot {
        /// Error message
        message: String,
    },

    /// Unknown scenario name
    #[error("Unknown scenario '{name}' (expected one of: stop, start, disconnect, connect)")]
    UnknownScenario {
        /// Name that did not match
        name: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProbeError {
    /// Create a wait timeout error
    #[must_use]
    pub fn wait_timeout(
        locator: impl std::fmt::Display,
        readiness: impl std::fmt::Display,
        timeout_ms: u64,
    ) -> Self {
        Self::WaitTimeout {
            locator: locator.to_string(),
            readiness: readiness.to_string(),
            timeout_ms,
        }
    }

    /// Create an element action error
    #[must_use]
    pub fn element(
        locator: impl std::fmt::Display,
        action: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Element {
            locator: locator.to_string(),
            action: action.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether this is the wait-bound failure
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::WaitTimeout { .. })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wait_timeout_names_locator() {
        let err = ProbeError::wait_timeout("xpath://*[@id=':r5:']", "present", 90_000);
        let msg = err.to_string();
        assert!(msg.contains("90000ms"));
        assert!(msg.contains(":r5:"));
        assert!(msg.contains("present"));
        assert!(err.is_timeout());
    }

    #[test]
    fn test_element_error() {
        let err = ProbeError::element("text:Tak", "click", "node detached");
        assert_eq!(err.to_string(), "Could not click text:Tak: node detached");
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_unknown_scenario_lists_names() {
        let err = ProbeError::UnknownScenario {
            name: "restart".to_string(),
        };
        assert!(err.to_string().contains("disconnect"));
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ProbeError = io_err.into();
        assert!(err.to_string().contains("I/O"));
    }
}
