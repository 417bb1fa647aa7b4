//! station-probe: end-to-end browser scenarios for the power-station lifecycle.
//!
//! Four scenarios (stop, start, disconnect, connect) drive a headless browser
//! against a running power-station management application. Each runs in its
//! own freshly authenticated session and every interaction is gated by a
//! bounded wait on the element it targets.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ ScenarioRun- │──►│ Session      │──►│ Waiter       │──►│ StationDriver│
//! │ ner (launch, │   │ (login,      │   │ (bounded     │   │ (chromium or │
//! │  teardown)   │   │ wait_then_act│   │  polling)    │   │  mock)       │
//! └──────────────┘   └──────────────┘   └──────────────┘   └──────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "browser")]
//! # async fn demo() {
//! use station_probe::{ChromiumLauncher, ProbeConfig, Scenario, ScenarioRunner};
//!
//! let config = ProbeConfig::new().with_base_url("http://localhost:3000");
//! let runner = ScenarioRunner::new(ChromiumLauncher, config).with_fail_fast(true);
//! let report = runner.run_suite(&Scenario::ALL).await;
//! assert!(report.all_passed());
//! # }
//! ```

#![warn(missing_docs)]

mod browser;
mod config;
mod driver;
pub mod fixtures;
mod locator;
pub mod mock;
mod result;
mod runner;
mod scenario;
mod session;
mod wait;

pub use browser::BrowserConfig;
#[cfg(feature = "browser")]
pub use browser::ChromiumDriver;
pub use config::{ProbeConfig, Viewport};
pub use driver::{Key, KeyInput, StationDriver};
pub use locator::{xpath_literal, Locator, Query};
pub use mock::{MockDriver, MockElement, MockJournal, Reaction, Trigger};
pub use result::{ProbeError, ProbeResult};
#[cfg(feature = "browser")]
pub use runner::ChromiumLauncher;
pub use runner::{
    DriverLauncher, FnLauncher, Phase, RunEvent, ScenarioOutcome, ScenarioRunner, SuiteReport,
};
pub use scenario::Scenario;
pub use session::{Action, Session};
pub use wait::{
    Readiness, WaitOptions, WaitResult, Waiter, DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS,
};
