//! Scenario execution for the `run` command

use crate::commands::RunArgs;
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::ProgressReporter;
use station_probe::{
    DriverLauncher, Phase, ProbeConfig, RunEvent, ScenarioOutcome, ScenarioRunner, SuiteReport,
};
use tracing::debug;

/// Exit code when every selected scenario passed
pub const EXIT_PASSED: u8 = 0;
/// Exit code when at least one scenario failed
pub const EXIT_FAILED: u8 = 1;
/// Exit code for configuration or launch errors before any scenario ran
pub const EXIT_SETUP_ERROR: u8 = 2;

/// Runs the selected scenarios and reports progress on stderr
#[derive(Debug)]
pub struct CliRunner {
    reporter: ProgressReporter,
}

impl CliRunner {
    /// Create a runner for the given presentation settings
    #[must_use]
    pub fn new(config: &CliConfig) -> Self {
        let reporter =
            ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());
        Self { reporter }
    }

    /// Run scenarios on a fresh tokio runtime
    ///
    /// # Errors
    ///
    /// Returns error if the runtime cannot be created
    pub fn run<L: DriverLauncher>(
        &mut self,
        launcher: L,
        probe_config: ProbeConfig,
        args: &RunArgs,
    ) -> CliResult<SuiteReport> {
        let scenarios = args.selected();
        let rt = tokio::runtime::Runtime::new().map_err(CliError::Runtime)?;
        debug!(
            base_url = %probe_config.base_url,
            scenarios = scenarios.len(),
            fail_fast = args.fail_fast,
            "starting suite"
        );

        self.reporter
            .info(&format!("Target: {}", probe_config.base_url));
        let screenshots = probe_config.output_dir.is_some();
        let runner = ScenarioRunner::new(launcher, probe_config).with_fail_fast(args.fail_fast);

        self.reporter.header("Station scenarios");
        self.reporter.start_progress(scenarios.len() as u64, "starting");

        let reporter = &self.reporter;
        let report = rt.block_on(runner.run_suite_with(&scenarios, |event| match event {
            RunEvent::Started(scenario) => reporter.set_message(scenario.name()),
            RunEvent::Finished(outcome) => {
                reporter.outcome(outcome);
                if screenshots && missing_screenshot(outcome) {
                    reporter.warning(&format!("no failure screenshot saved for {}", outcome.name));
                }
                reporter.increment(1);
            }
        }));

        self.reporter.finish();
        let skipped = scenarios.len().saturating_sub(report.total());
        self.reporter
            .summary(report.passed(), report.failed(), skipped, report.duration);

        Ok(report)
    }
}

/// A failure after launch should have left a screenshot behind
fn missing_screenshot(outcome: &ScenarioOutcome) -> bool {
    !outcome.passed
        && outcome.failed_phase != Some(Phase::Launch)
        && outcome.failed_phase != Some(Phase::Teardown)
        && outcome.screenshot.is_none()
}

/// Process exit code for a finished suite
#[must_use]
pub fn exit_code(report: &SuiteReport) -> u8 {
    if report.launch_failed() {
        EXIT_SETUP_ERROR
    } else if report.all_passed() {
        EXIT_PASSED
    } else {
        EXIT_FAILED
    }
}
