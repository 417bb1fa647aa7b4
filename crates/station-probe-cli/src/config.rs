//! CLI configuration

use crate::commands::Cli;
use crate::error::CliResult;
use crate::output::OutputFormat;
use station_probe::ProbeConfig;

/// CLI verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Quiet - minimal output
    Quiet,
    /// Normal - default output
    #[default]
    Normal,
    /// Verbose - extra output
    Verbose,
    /// Debug - maximum output
    Debug,
}

impl Verbosity {
    /// Derive from the `-q` flag and the `-v` count
    #[must_use]
    pub const fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            return Self::Quiet;
        }
        match verbose {
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::Debug,
        }
    }

    /// Check if quiet mode
    #[must_use]
    pub const fn is_quiet(self) -> bool {
        matches!(self, Self::Quiet)
    }

    /// Default log filter when `RUST_LOG` is unset
    #[must_use]
    pub const fn log_filter(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "info",
            Self::Verbose => "debug",
            Self::Debug => "trace",
        }
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Always use colors
    Always,
    /// Use colors when output is a terminal
    #[default]
    Auto,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Should use colors based on output detection
    #[must_use]
    pub fn should_color(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => std::io::IsTerminal::is_terminal(&std::io::stderr()),
        }
    }
}

/// CLI presentation settings
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Color output choice
    pub color: ColorChoice,
    /// Report format
    pub format: OutputFormat,
    /// Emit logs as JSON
    pub log_json: bool,
}

impl CliConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from parsed arguments
    #[must_use]
    pub fn from_cli(cli: &Cli) -> Self {
        Self::new()
            .with_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose))
            .with_color(cli.color.clone().into())
            .with_format(cli.format.into())
            .with_log_json(cli.log_json)
    }

    /// Set verbosity
    #[must_use]
    pub const fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set color choice
    #[must_use]
    pub const fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    /// Set report format
    #[must_use]
    pub const fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Set JSON logging
    #[must_use]
    pub const fn with_log_json(mut self, log_json: bool) -> Self {
        self.log_json = log_json;
        self
    }
}

/// Resolve the run configuration.
///
/// Precedence, lowest first: built-in defaults, the `--config` file, then
/// flags and their environment variables.
pub fn resolve_probe_config(cli: &Cli) -> CliResult<ProbeConfig> {
    let mut config = match cli.config {
        Some(ref path) => ProbeConfig::from_file(path)?,
        None => ProbeConfig::default(),
    };

    if let Some(ref url) = cli.base_url {
        config.base_url.clone_from(url);
    }
    if let Some(ref username) = cli.username {
        config.username.clone_from(username);
    }
    if let Some(ref password) = cli.password {
        config.password.clone_from(password);
    }
    if let Some(secs) = cli.timeout_secs {
        config.wait_timeout_ms = secs.saturating_mul(1_000);
    }
    if cli.headed {
        config.browser.headless = false;
    }
    if let Some(ref path) = cli.chromium_path {
        config.browser.chromium_path = Some(path.clone());
    }
    if cli.no_sandbox {
        config.browser.sandbox = false;
    }
    if let Some(ref dir) = cli.output {
        config.output_dir = Some(dir.clone());
    }

    config.validate()?;
    Ok(config)
}
