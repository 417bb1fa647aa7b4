//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use station_probe::Scenario;
use std::path::PathBuf;

/// station-probe: power-station lifecycle scenarios in a headless browser
#[derive(Parser, Debug)]
#[command(name = "station-probe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// YAML configuration file
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the application
    #[arg(long, env = "STATION_PROBE_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Login name
    #[arg(long, env = "STATION_PROBE_USERNAME", global = true)]
    pub username: Option<String>,

    /// Login password
    #[arg(long, env = "STATION_PROBE_PASSWORD", hide_env_values = true, global = true)]
    pub password: Option<String>,

    /// Maximum wait for any element, in seconds
    #[arg(long, env = "STATION_PROBE_TIMEOUT_SECS", global = true)]
    pub timeout_secs: Option<u64>,

    /// Show the browser window
    #[arg(long, global = true)]
    pub headed: bool,

    /// Chromium executable
    #[arg(long, env = "CHROMIUM_PATH", global = true)]
    pub chromium_path: Option<String>,

    /// Disable the Chromium sandbox (containers, CI)
    #[arg(long, global = true)]
    pub no_sandbox: bool,

    /// Directory for failure screenshots
    #[arg(short, long, value_name = "DIR", global = true)]
    pub output: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "text", global = true)]
    pub format: FormatArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run scenarios (all when none are named)
    Run(RunArgs),

    /// List available scenarios
    List,

    /// Show the effective configuration
    Config,
}

/// Arguments for the run command
#[derive(Parser, Debug, Default)]
pub struct RunArgs {
    /// Scenarios to run: stop, start, disconnect, connect
    #[arg(value_name = "SCENARIO")]
    pub scenarios: Vec<Scenario>,

    /// Stop after the first failing scenario
    #[arg(long)]
    pub fail_fast: bool,
}

impl RunArgs {
    /// Selected scenarios, or all of them in declaration order
    #[must_use]
    pub fn selected(&self) -> Vec<Scenario> {
        if self.scenarios.is_empty() {
            Scenario::ALL.to_vec()
        } else {
            self.scenarios.clone()
        }
    }
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

/// Report format argument
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum FormatArg {
    /// Human-readable text
    #[default]
    Text,
    /// JSON report on stdout
    Json,
}

impl From<FormatArg> for crate::output::OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => Self::Text,
            FormatArg::Json => Self::Json,
        }
    }
}
