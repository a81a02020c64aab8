//! Tracing subscriber setup.
//!
//! Logs go to stderr so stdout only carries progress lines and reports.
//! `RUST_LOG` overrides the level picked from the command-line flags.

use crate::error::LoggingError;
use tracing_subscriber::EnvFilter;

/// Filter directive used when `RUST_LOG` is unset.
pub fn default_directive(verbose: bool, quiet: bool) -> &'static str {
    match (verbose, quiet) {
        (true, _) => "sslscan_etl=debug,info",
        (false, true) => "warn",
        (false, false) => "info",
    }
}

/// Install the global subscriber.
pub fn init_logging(verbose: bool, quiet: bool) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))
}
