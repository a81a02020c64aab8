//! JSON output formatting.

use crate::pipeline::{RunReport, RunStatus};
use crate::storage::StorageDocument;
use serde::Serialize;
use std::io;

#[derive(Serialize)]
struct JsonReport<'a> {
    run_id: String,
    host: &'a str,
    status: &'static str,
    exit_code: u8,
    extract_error: Option<String>,
    load: String,
    document: Option<&'a StorageDocument>,
}

fn status_name(status: RunStatus) -> &'static str {
    match status {
        RunStatus::Stored => "stored",
        RunStatus::AlreadyStored => "already_stored",
        RunStatus::NoData => "no_data",
        RunStatus::StoreFailed => "store_failed",
    }
}

/// Render the run report as pretty JSON.
pub fn to_json(report: &RunReport) -> serde_json::Result<String> {
    let status = report.status();
    serde_json::to_string_pretty(&JsonReport {
        run_id: report.run_id.to_string(),
        host: report.host.as_str(),
        status: status_name(status),
        exit_code: status.exit_code(),
        extract_error: report.extract_error.as_ref().map(ToString::to_string),
        load: report.load.to_string(),
        document: report.document.as_ref(),
    })
}

/// Print the run report in JSON format.
pub fn print_json(report: &RunReport) -> io::Result<()> {
    let json = to_json(report).map_err(io::Error::other)?;
    println!("{}", json);
    Ok(())
}
