//! Command-line interface definitions for sslscan-etl.
//!
//! Uses `clap` derive macros for declarative argument parsing.

use crate::types::Hostname;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Hostname assessed when none is given.
pub const DEFAULT_HOSTNAME: &str = "www.ssllabs.com";

/// Fetch an SSL Labs assessment for a host and store it in MongoDB.
#[derive(Parser, Debug)]
#[command(name = "sslscan-etl")]
#[command(author = "HueCodes <huecodes@proton.me>")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Store SSL Labs assessments in MongoDB", long_about = None)]
pub struct Args {
    /// Hostname to assess
    #[arg(value_name = "HOSTNAME", default_value = DEFAULT_HOSTNAME, value_parser = parse_hostname)]
    pub hostname: Hostname,

    /// Env file to load before reading settings
    #[arg(long, value_name = "PATH", env = "SSLSCAN_ETL_ENV_FILE")]
    pub env_file: Option<PathBuf>,

    /// Load into an in-memory store instead of MongoDB
    #[arg(long)]
    pub dry_run: bool,

    /// Output format for the run summary
    #[arg(short, long, value_enum, default_value = "plain")]
    pub output: OutputFormat,

    /// Enable debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors, and skip progress lines
    #[arg(short, long)]
    pub quiet: bool,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable plain text
    #[default]
    Plain,
    /// JSON structured output
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Json => write!(f, "json"),
        }
    }
}

fn parse_hostname(s: &str) -> Result<Hostname, String> {
    Hostname::parse(s).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_hostname() {
        let args = Args::try_parse_from(["sslscan-etl"]).unwrap();
        assert_eq!(args.hostname.as_str(), DEFAULT_HOSTNAME);
        assert_eq!(args.output, OutputFormat::Plain);
        assert!(!args.dry_run);
    }

    #[test]
    fn test_explicit_flags() {
        let args = Args::try_parse_from([
            "sslscan-etl",
            "example.com",
            "--dry-run",
            "-o",
            "json",
            "--env-file",
            "etl.env",
        ])
        .unwrap();

        assert_eq!(args.hostname.as_str(), "example.com");
        assert!(args.dry_run);
        assert_eq!(args.output, OutputFormat::Json);
        assert_eq!(args.env_file, Some(PathBuf::from("etl.env")));
    }

    #[test]
    fn test_rejects_url_hostname() {
        assert!(Args::try_parse_from(["sslscan-etl", "https://example.com"]).is_err());
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Args::try_parse_from(["sslscan-etl", "-v", "-q"]).is_err());
    }
}
