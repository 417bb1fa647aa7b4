//! station-probe: run power-station lifecycle scenarios from the command line
//!
//! ## Usage
//!
//! ```bash
//! station-probe run                          # All scenarios, in order
//! station-probe run stop start --fail-fast   # Selected scenarios
//! station-probe list                         # Scenario catalogue
//! station-probe --config probe.yaml config   # Effective configuration
//! ```

use clap::Parser;
use station_probe_cli::{
    logging, render_catalogue, resolve_probe_config, Cli, CliConfig, CliResult,
    Commands, OutputFormat, RunArgs, EXIT_SETUP_ERROR,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(EXIT_SETUP_ERROR)
        }
    }
}

fn run() -> CliResult<u8> {
    let cli = Cli::parse();
    let config = CliConfig::from_cli(&cli);
    logging::init_logging(&config)?;

    match cli.command {
        Commands::List => {
            println!("{}", render_catalogue());
            Ok(0)
        }
        Commands::Config => {
            let mut shown = resolve_probe_config(&cli)?;
            if !shown.password.is_empty() {
                shown.password = "********".to_string();
            }
            match config.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&shown)?),
                OutputFormat::Text => print!("{}", shown.to_yaml()?),
            }
            Ok(0)
        }
        Commands::Run(ref args) => {
            let probe_config = resolve_probe_config(&cli)?;
            run_scenarios(&config, probe_config, args)
        }
    }
}

#[cfg(feature = "browser")]
fn run_scenarios(
    config: &CliConfig,
    probe_config: station_probe::ProbeConfig,
    args: &RunArgs,
) -> CliResult<u8> {
    let mut runner = station_probe_cli::CliRunner::new(config);
    let report = runner.run(station_probe::ChromiumLauncher, probe_config, args)?;

    if config.format == OutputFormat::Json {
        println!("{}", station_probe_cli::render_json(&report)?);
    }
    Ok(station_probe_cli::exit_code(&report))
}

#[cfg(not(feature = "browser"))]
fn run_scenarios(
    _config: &CliConfig,
    _probe_config: station_probe::ProbeConfig,
    _args: &RunArgs,
) -> CliResult<u8> {
    Err(station_probe_cli::CliError::invalid_argument(
        "browser support not enabled. Rebuild with --features browser",
    ))
}
