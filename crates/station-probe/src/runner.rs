//! Scenario runner.
//!
//! Every scenario gets its own browser: launch, log in, run the script,
//! capture a screenshot on failure, close. Closing happens on every path
//! once a browser was launched.

use crate::config::ProbeConfig;
use crate::driver::StationDriver;
use crate::result::{ProbeError, ProbeResult};
use crate::scenario::Scenario;
use crate::session::Session;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{error, info, warn};

// =============================================================================
// LAUNCHERS
// =============================================================================

/// Creates a fresh driver for each scenario
#[async_trait]
pub trait DriverLauncher: Send + Sync {
    /// Driver type produced by this launcher
    type Driver: StationDriver;

    /// Launch a new browser
    async fn launch(&self, config: &ProbeConfig) -> ProbeResult<Self::Driver>;
}

/// Launcher backed by a closure, for drivers that start synchronously
pub struct FnLauncher<F> {
    launch: F,
}

impl<F> FnLauncher<F> {
    /// Wrap a launch closure
    pub const fn new(launch: F) -> Self {
        Self { launch }
    }
}

impl<F> std::fmt::Debug for FnLauncher<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnLauncher").finish_non_exhaustive()
    }
}

#[async_trait]
impl<F, D> DriverLauncher for FnLauncher<F>
where
    F: Fn(&ProbeConfig) -> ProbeResult<D> + Send + Sync,
    D: StationDriver + 'static,
{
    type Driver = D;

    async fn launch(&self, config: &ProbeConfig) -> ProbeResult<D> {
        (self.launch)(config)
    }
}

/// Launches headless Chromium through CDP
#[cfg(feature = "browser")]
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromiumLauncher;

#[cfg(feature = "browser")]
#[async_trait]
impl DriverLauncher for ChromiumLauncher {
    type Driver = crate::browser::ChromiumDriver;

    async fn launch(&self, config: &ProbeConfig) -> ProbeResult<Self::Driver> {
        crate::browser::ChromiumDriver::launch(&config.browser).await
    }
}

// =============================================================================
// OUTCOMES
// =============================================================================

/// Stage of a scenario run that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Browser did not start
    Launch,
    /// Login controls missing or login failed
    Login,
    /// The scenario script
    Script,
    /// Closing the browser
    Teardown,
}

/// Result of one scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    /// Scenario name
    pub name: String,
    /// Whether the scenario passed
    pub passed: bool,
    /// Failure message
    pub error: Option<String>,
    /// Stage that failed
    pub failed_phase: Option<Phase>,
    /// Whether the failure was an unmet wait
    pub timed_out: bool,
    /// Wall time including setup and teardown
    pub duration: Duration,
    /// Failure screenshot, when one was saved
    pub screenshot: Option<PathBuf>,
}

impl ScenarioOutcome {
    fn pass(scenario: Scenario, duration: Duration) -> Self {
        Self {
            name: scenario.name().to_string(),
            passed: true,
            error: None,
            failed_phase: None,
            timed_out: false,
            duration,
            screenshot: None,
        }
    }

    fn fail(scenario: Scenario, phase: Phase, err: &ProbeError, duration: Duration) -> Self {
        Self {
            name: scenario.name().to_string(),
            passed: false,
            error: Some(err.to_string()),
            failed_phase: Some(phase),
            timed_out: err.is_timeout(),
            duration,
            screenshot: None,
        }
    }
}

/// Results of a suite run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Outcomes in run order
    pub outcomes: Vec<ScenarioOutcome>,
    /// Total duration
    pub duration: Duration,
}

impl SuiteReport {
    /// Number of passed scenarios
    #[must_use]
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed).count()
    }

    /// Number of failed scenarios
    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.passed).count()
    }

    /// Number of scenarios run
    #[must_use]
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Check if every scenario passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.outcomes.iter().all(|o| o.passed)
    }

    /// Failed outcomes
    #[must_use]
    pub fn failures(&self) -> Vec<&ScenarioOutcome> {
        self.outcomes.iter().filter(|o| !o.passed).collect()
    }

    /// True when the first scenario could not even launch a browser
    #[must_use]
    pub fn launch_failed(&self) -> bool {
        self.outcomes
            .first()
            .is_some_and(|o| o.failed_phase == Some(Phase::Launch))
    }
}

/// Progress notification from a suite run
#[derive(Debug)]
pub enum RunEvent<'a> {
    /// A scenario is about to start
    Started(Scenario),
    /// A scenario finished
    Finished(&'a ScenarioOutcome),
}

// =============================================================================
// RUNNER
// =============================================================================

/// Runs scenarios, one fresh session each
#[derive(Debug)]
pub struct ScenarioRunner<L> {
    launcher: L,
    config: ProbeConfig,
    fail_fast: bool,
}

impl<L: DriverLauncher> ScenarioRunner<L> {
    /// Create a runner
    #[must_use]
    pub const fn new(launcher: L, config: ProbeConfig) -> Self {
        Self {
            launcher,
            config,
            fail_fast: false,
        }
    }

    /// Stop the suite after the first failure
    #[must_use]
    pub const fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Configuration used for every session
    #[must_use]
    pub const fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Run one scenario in a fresh session
    pub async fn run(&self, scenario: Scenario) -> ScenarioOutcome {
        let start = Instant::now();

        let driver = match self.launcher.launch(&self.config).await {
            Ok(driver) => driver,
            Err(e) => {
                error!(scenario = scenario.name(), error = %e, "browser launch failed");
                return ScenarioOutcome::fail(scenario, Phase::Launch, &e, start.elapsed());
            }
        };

        let mut session = Session::new(driver, self.config.clone());
        let result = match session.login().await {
            Ok(()) => scenario.run(&mut session).await.map_err(|e| (Phase::Script, e)),
            Err(e) => Err((Phase::Login, e)),
        };

        let screenshot = match &result {
            Err(_) => self.capture_failure(scenario, &mut session).await,
            Ok(()) => None,
        };

        let closed = session.close().await;
        if let Err(ref e) = closed {
            warn!(scenario = scenario.name(), error = %e, "teardown failed");
        }

        let duration = start.elapsed();
        let mut outcome = match (result, closed) {
            (Ok(()), Ok(())) => ScenarioOutcome::pass(scenario, duration),
            (Ok(()), Err(e)) => ScenarioOutcome::fail(scenario, Phase::Teardown, &e, duration),
            (Err((phase, e)), _) => ScenarioOutcome::fail(scenario, phase, &e, duration),
        };
        outcome.screenshot = screenshot;

        if outcome.passed {
            info!(
                scenario = scenario.name(),
                duration_ms = duration.as_millis() as u64,
                "scenario passed"
            );
        } else {
            error!(
                scenario = scenario.name(),
                error = outcome.error.as_deref().unwrap_or_default(),
                "scenario failed"
            );
        }
        outcome
    }

    /// Run scenarios in order
    pub async fn run_suite(&self, scenarios: &[Scenario]) -> SuiteReport {
        self.run_suite_with(scenarios, |_| {}).await
    }

    /// Run scenarios in order, reporting progress to `observe`
    pub async fn run_suite_with<F>(&self, scenarios: &[Scenario], mut observe: F) -> SuiteReport
    where
        F: FnMut(RunEvent<'_>) + Send,
    {
        let start = Instant::now();
        let mut report = SuiteReport::default();

        for &scenario in scenarios {
            observe(RunEvent::Started(scenario));
            let outcome = self.run(scenario).await;
            observe(RunEvent::Finished(&outcome));

            let failed = !outcome.passed;
            report.outcomes.push(outcome);
            if failed && self.fail_fast {
                info!("fail-fast: skipping remaining scenarios");
                break;
            }
        }

        report.duration = start.elapsed();
        report
    }

    /// Save a screenshot of the failed page; never fails the run
    async fn capture_failure(
        &self,
        scenario: Scenario,
        session: &mut Session<L::Driver>,
    ) -> Option<PathBuf> {
        let path = self.config.failure_screenshot_path(scenario.name())?;
        let saved = async {
            let png = session.screenshot().await?;
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir)?;
            }
            std::fs::write(&path, png)?;
            Ok::<_, ProbeError>(())
        }
        .await;

        match saved {
            Ok(()) => {
                info!(path = %path.display(), "failure screenshot saved");
                Some(path)
            }
            Err(e) => {
                warn!(error = %e, "could not save failure screenshot");
                None
            }
        }
    }
}
