//! Output formatting module.
//!
//! Progress lines and run summaries in plain text or JSON.

mod json_format;
mod plain;

pub use json_format::{print_json, to_json};
pub use plain::{
    print_completed, print_error, print_info, print_plain, print_run_header, print_stage,
    print_warning,
};

use crate::cli::OutputFormat;
use crate::pipeline::RunReport;
use std::io;

/// Format and print the run report according to the specified format.
pub fn print_report(report: &RunReport, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Plain => plain::print_plain(report),
        OutputFormat::Json => json_format::print_json(report),
    }
}
