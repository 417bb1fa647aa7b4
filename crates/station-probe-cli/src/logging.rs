//! Logging initialization.
//!
//! Logs go to stderr so that `--format json` keeps stdout machine readable.
//! `RUST_LOG` takes precedence over the verbosity flags.

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. Call once, before any logging.
pub fn init_logging(config: &CliConfig) -> CliResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.verbosity.log_filter()));

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if config.log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(config.color.should_color())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    installed.map_err(|e| CliError::logging(e.to_string()))
}
