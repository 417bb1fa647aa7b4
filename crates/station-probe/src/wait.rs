//! Bounded waits for element readiness.
//!
//! Every action in a scenario is gated by a [`Readiness`] predicate over one
//! locator. The [`Waiter`] polls the driver until the predicate holds or the
//! bound runs out, in which case it fails with [`ProbeError::WaitTimeout`].

use crate::driver::StationDriver;
use crate::locator::Locator;
use crate::result::{ProbeError, ProbeResult};
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, trace};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default wait bound (90 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 90_000;

/// Default polling interval (250ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 250;

// =============================================================================
// READINESS
// =============================================================================

/// Predicate an element must satisfy before it is acted on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Readiness {
    /// Element exists in the DOM
    #[default]
    Present,
    /// Element exists, has a layout box, is not hidden and is not disabled
    Clickable,
}

impl Readiness {
    /// Name used in diagnostics
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Clickable => "clickable",
        }
    }

    /// JavaScript that evaluates the predicate for `locator` to a boolean
    #[must_use]
    pub fn script(&self, locator: &Locator) -> String {
        let query = locator.to_query().to_js();
        match self {
            Self::Present => format!("(() => {{ const el = {query}; return el != null; }})()"),
            Self::Clickable => format!(
                "(() => {{ \
                 const el = {query}; \
                 if (el == null) return false; \
                 const r = el.getBoundingClientRect(); \
                 const s = window.getComputedStyle(el); \
                 return r.width > 0 && r.height > 0 \
                 && s.visibility !== 'hidden' && s.display !== 'none' \
                 && !el.disabled; \
                 }})()"
            ),
        }
    }
}

impl fmt::Display for Readiness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// WAIT OPTIONS
// =============================================================================

/// Options for wait operations
#[derive(Debug, Clone)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// =============================================================================
// WAIT RESULT
// =============================================================================

/// Result of a successful wait
#[derive(Debug, Clone)]
pub struct WaitResult {
    /// Time spent waiting
    pub elapsed: Duration,
    /// Number of predicate evaluations
    pub polls: u32,
    /// Description of what was waited for
    pub waited_for: String,
}

// =============================================================================
// WAITER
// =============================================================================

/// Bounded-wait helper owned by a session
#[derive(Debug, Clone, Default)]
pub struct Waiter {
    options: WaitOptions,
}

impl Waiter {
    /// Create a waiter with default options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom options
    #[must_use]
    pub const fn with_options(options: WaitOptions) -> Self {
        Self { options }
    }

    /// Get the options
    #[must_use]
    pub const fn options(&self) -> &WaitOptions {
        &self.options
    }

    /// Poll until `locator` satisfies `readiness`.
    ///
    /// The predicate is always evaluated at least once, so a zero timeout
    /// still succeeds for an element that is already there.
    pub async fn until<D>(
        &self,
        driver: &mut D,
        locator: &Locator,
        readiness: Readiness,
    ) -> ProbeResult<WaitResult>
    where
        D: StationDriver + ?Sized,
    {
        let start = Instant::now();
        let timeout = self.options.timeout();
        let mut polls = 0_u32;

        loop {
            polls += 1;
            if driver.is_ready(locator, readiness).await? {
                let elapsed = start.elapsed();
                debug!(
                    %locator,
                    %readiness,
                    polls,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "element ready"
                );
                return Ok(WaitResult {
                    elapsed,
                    polls,
                    waited_for: format!("{locator} to be {readiness}"),
                });
            }

            if start.elapsed() >= timeout {
                return Err(ProbeError::wait_timeout(
                    locator,
                    readiness,
                    self.options.timeout_ms,
                ));
            }

            trace!(%locator, %readiness, polls, "not ready yet");
            tokio::time::sleep(self.options.poll_interval()).await;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::mock::{MockDriver, MockElement};

    mod readiness_tests {
        use super::*;

        #[test]
        fn test_readiness_names() {
            assert_eq!(Readiness::Present.to_string(), "present");
            assert_eq!(Readiness::Clickable.to_string(), "clickable");
            assert_eq!(Readiness::default(), Readiness::Present);
        }

        #[test]
        fn test_present_script_checks_null() {
            let script = Readiness::Present.script(&Locator::id("login-input"));
            assert!(script.contains("//*[@id='login-input']"));
            assert!(script.contains("el != null"));
        }

        #[test]
        fn test_clickable_script_checks_layout_and_disabled() {
            let script = Readiness::Clickable.script(&Locator::text("Dodaj do systemu"));
            assert!(script.contains("getBoundingClientRect"));
            assert!(script.contains("!el.disabled"));
            assert!(script.contains("visibility"));
        }
    }

    mod wait_options_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let opts = WaitOptions::default();
            assert_eq!(opts.timeout_ms, 90_000);
            assert_eq!(opts.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
        }

        #[test]
        fn test_builders_and_durations() {
            let opts = WaitOptions::new().with_timeout(1500).with_poll_interval(10);
            assert_eq!(opts.timeout(), Duration::from_millis(1500));
            assert_eq!(opts.poll_interval(), Duration::from_millis(10));
        }
    }

    mod waiter_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_immediate_success_polls_once() {
            let mut driver = MockDriver::new().with_element(MockElement::new(Locator::text("Tak")));
            let waiter = Waiter::new();

            let result = waiter
                .until(&mut driver, &Locator::text("Tak"), Readiness::Present)
                .await
                .unwrap();
            assert_eq!(result.polls, 1);
            assert!(result.waited_for.contains("Tak"));
        }

        #[tokio::test(start_paused = true)]
        async fn test_element_appearing_later_is_found() {
            let loc = Locator::id(":r5:");
            let mut driver =
                MockDriver::new().with_element(MockElement::new(loc.clone()).appearing_after(3));
            let waiter = Waiter::with_options(WaitOptions::new().with_poll_interval(100));

            let result = waiter
                .until(&mut driver, &loc, Readiness::Present)
                .await
                .unwrap();
            assert_eq!(result.polls, 4);
            assert!(result.elapsed >= Duration::from_millis(300));
        }

        #[tokio::test(start_paused = true)]
        async fn test_missing_element_times_out_with_locator() {
            let mut driver = MockDriver::new();
            let waiter = Waiter::with_options(WaitOptions::new().with_timeout(1_000));

            let err = waiter
                .until(&mut driver, &Locator::text("Zatrzymana"), Readiness::Present)
                .await
                .unwrap_err();
            match err {
                ProbeError::WaitTimeout {
                    locator,
                    readiness,
                    timeout_ms,
                } => {
                    assert!(locator.contains("Zatrzymana"));
                    assert_eq!(readiness, "present");
                    assert_eq!(timeout_ms, 1_000);
                }
                other => panic!("expected timeout, got {other:?}"),
            }
        }

        #[tokio::test(start_paused = true)]
        async fn test_present_but_not_clickable_times_out() {
            let loc = Locator::text("Dodaj do systemu");
            let mut driver =
                MockDriver::new().with_element(MockElement::new(loc.clone()).not_clickable());
            let waiter = Waiter::with_options(WaitOptions::new().with_timeout(500));

            assert!(waiter
                .until(&mut driver, &loc, Readiness::Present)
                .await
                .is_ok());
            assert!(waiter
                .until(&mut driver, &loc, Readiness::Clickable)
                .await
                .unwrap_err()
                .is_timeout());
        }

        #[tokio::test(start_paused = true)]
        async fn test_zero_timeout_still_checks_once() {
            let loc = Locator::text("Tak");
            let mut driver = MockDriver::new().with_element(MockElement::new(loc.clone()));
            let waiter = Waiter::with_options(WaitOptions::new().with_timeout(0));

            assert!(waiter.until(&mut driver, &loc, Readiness::Present).await.is_ok());
        }

        #[tokio::test(start_paused = true)]
        async fn test_driver_error_is_not_reported_as_timeout() {
            let loc = Locator::text("Tak");
            let mut driver = MockDriver::new().with_element(MockElement::new(loc.clone()));
            driver.close().await.unwrap();
            let waiter = Waiter::new();
            let start = tokio::time::Instant::now();

            let err = waiter
                .until(&mut driver, &loc, Readiness::Present)
                .await
                .unwrap_err();

            assert!(!err.is_timeout());
            assert!(err.to_string().contains("browser closed"));
            assert_eq!(start.elapsed(), Duration::ZERO);
        }
    }
}
