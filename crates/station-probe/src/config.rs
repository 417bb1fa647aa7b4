//! Run configuration.
//!
//! Defaults reproduce the values the scenarios were written against: a local
//! application, the `admin` account, a 90 second wait bound and a 1980x1080
//! viewport. Any field can be overridden from YAML.

use crate::browser::BrowserConfig;
use crate::fixtures;
use crate::result::{ProbeError, ProbeResult};
use crate::wait::{WaitOptions, DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Viewport dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Viewport {
    /// Width in CSS pixels
    pub width: u32,
    /// Height in CSS pixels
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1980,
            height: 1080,
        }
    }
}

/// Configuration shared by every scenario of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProbeConfig {
    /// Base URL of the application, without trailing slash
    pub base_url: String,
    /// Login name
    pub username: String,
    /// Login password
    pub password: String,
    /// Wait bound for every readiness predicate
    pub wait_timeout_ms: u64,
    /// Interval between readiness checks
    pub poll_interval_ms: u64,
    /// Pause after typing a list filter (0 disables)
    pub settle_delay_ms: u64,
    /// Viewport applied after opening the login page
    pub viewport: Viewport,
    /// Browser launch options
    pub browser: BrowserConfig,
    /// Directory for failure screenshots (None disables them)
    pub output_dir: Option<PathBuf>,
    /// Identifier searched by the disconnect scenario and re-entered by connect
    pub disconnect_station_id: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost".to_string(),
            username: "admin".to_string(),
            password: "password".to_string(),
            wait_timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            settle_delay_ms: 5_000,
            viewport: Viewport::default(),
            browser: BrowserConfig::default(),
            output_dir: None,
            disconnect_station_id: fixtures::DISCONNECT_TARGET_ID.to_string(),
        }
    }
}

impl ProbeConfig {
    /// Create default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a YAML document; missing fields keep their defaults and
    /// unknown fields are rejected
    ///
    /// # Errors
    ///
    /// Returns error if the YAML is malformed or the result is invalid
    pub fn from_yaml(yaml: &str) -> ProbeResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed
    pub fn from_file(path: impl AsRef<Path>) -> ProbeResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Serialize to YAML
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails
    pub fn to_yaml(&self) -> ProbeResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Check the values a run depends on
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the offending field
    pub fn validate(&self) -> ProbeResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ProbeError::config(format!(
                "base_url must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }
        if self.username.is_empty() {
            return Err(ProbeError::config("username must not be empty"));
        }
        if self.poll_interval_ms == 0 {
            return Err(ProbeError::config("poll_interval_ms must be positive"));
        }
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(ProbeError::config("viewport dimensions must be positive"));
        }
        if self.disconnect_station_id.is_empty() {
            return Err(ProbeError::config("disconnect_station_id must not be empty"));
        }
        Ok(())
    }

    /// Absolute URL for an application path
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    /// Login page URL
    #[must_use]
    pub fn login_url(&self) -> String {
        self.url(fixtures::LOGIN_PATH)
    }

    /// Wait options derived from this configuration
    #[must_use]
    pub const fn wait_options(&self) -> WaitOptions {
        WaitOptions {
            timeout_ms: self.wait_timeout_ms,
            poll_interval_ms: self.poll_interval_ms,
        }
    }

    /// Settle delay as Duration
    #[must_use]
    pub const fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Path of the failure screenshot for a scenario, when enabled
    #[must_use]
    pub fn failure_screenshot_path(&self, scenario: &str) -> Option<PathBuf> {
        self.output_dir
            .as_ref()
            .map(|dir| dir.join(format!("{scenario}-failure.png")))
    }

    /// Set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set credentials
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    /// Set wait bound in milliseconds
    #[must_use]
    pub const fn with_wait_timeout(mut self, timeout_ms: u64) -> Self {
        self.wait_timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Set settle delay in milliseconds
    #[must_use]
    pub const fn with_settle_delay(mut self, settle_delay_ms: u64) -> Self {
        self.settle_delay_ms = settle_delay_ms;
        self
    }

    /// Set browser options
    #[must_use]
    pub fn with_browser(mut self, browser: BrowserConfig) -> Self {
        self.browser = browser;
        self
    }

    /// Set failure screenshot directory
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }
}
