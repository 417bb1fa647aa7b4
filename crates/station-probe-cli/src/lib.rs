//! station-probe CLI library
//!
//! Argument parsing, configuration resolution, logging setup and report
//! output for the `station-probe` binary.

#![warn(missing_docs)]

mod commands;
mod config;
mod error;
pub mod logging;
mod output;
mod runner;

pub use commands::{Cli, ColorArg, Commands, FormatArg, RunArgs};
pub use config::{resolve_probe_config, CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{render_catalogue, render_json, OutputFormat, ProgressReporter};
pub use runner::{exit_code, CliRunner, EXIT_FAILED, EXIT_PASSED, EXIT_SETUP_ERROR};
