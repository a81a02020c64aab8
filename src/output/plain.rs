//! Plain text output formatting.
//!
//! Produces human-readable output with colors and formatting.

use crate::pipeline::{RunReport, RunStatus, Stage};
use crate::types::Hostname;
use console::{style, Style};
use serde_json::Value;
use std::io::{self, Write};

const RULE: &str = "═══════════════════════════════════════════════════════════════";
const THIN_RULE: &str = "───────────────────────────────────────────────────────────────";

/// Print the run summary in human-readable plain text format.
pub fn print_plain(report: &RunReport) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_plain(&mut out, report)
}

fn write_plain<W: Write>(out: &mut W, report: &RunReport) -> io::Result<()> {
    // Header
    writeln!(out)?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(
        out,
        "                  {} Run Summary",
        style("sslscan-etl").cyan().bold()
    )?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out)?;

    writeln!(out, "  {} {}", style("Host:").bold(), report.host)?;
    writeln!(
        out,
        "  {} {}",
        style("Run ID:").bold(),
        style(report.run_id.short()).dim()
    )?;

    let status = report.status();
    writeln!(
        out,
        "  {} {}",
        style("Result:").bold(),
        status_style(status).apply_to(report.load.to_string())
    )?;
    if let Some(err) = &report.extract_error {
        writeln!(out, "  {} {}", style("Extraction:").bold(), style(err).red())?;
    }
    writeln!(out)?;

    // Endpoint table
    match &report.document {
        None => writeln!(out, "  {}", style("No assessment to display.").dim())?,
        Some(document) => {
            writeln!(
                out,
                "  {} {}",
                style("Assessment:").bold(),
                document.summary()
            )?;
            writeln!(out)?;
            writeln!(out, "  {}", style(THIN_RULE).dim())?;
            writeln!(
                out,
                "  {:<40}  {:^6}  {}",
                style("IP ADDRESS").bold(),
                style("GRADE").bold(),
                style("STATUS").bold()
            )?;
            writeln!(out, "  {}", style(THIN_RULE).dim())?;

            for endpoint in &document.endpoints {
                let grade = field(endpoint, "grade");
                writeln!(
                    out,
                    "  {:<40}  {:^6}  {}",
                    field(endpoint, "ipAddress"),
                    grade_style(&grade).apply_to(&grade),
                    style(truncate_string(&field(endpoint, "statusMessage"), 30)).dim()
                )?;
            }

            writeln!(out, "  {}", style(THIN_RULE).dim())?;
        }
    }

    writeln!(out)?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out)?;

    Ok(())
}

fn status_style(status: RunStatus) -> Style {
    match status {
        RunStatus::Stored => Style::new().green().bold(),
        RunStatus::AlreadyStored => Style::new().yellow(),
        RunStatus::NoData | RunStatus::StoreFailed => Style::new().red().bold(),
    }
}

fn grade_style(grade: &str) -> Style {
    match grade.chars().next() {
        Some('A') => Style::new().green().bold(),
        Some('B') | Some('C') => Style::new().yellow(),
        Some(_) => Style::new().red(),
        None => Style::new().dim(),
    }
}

/// A string field of an endpoint record, or `-` when absent.
fn field(endpoint: &Value, key: &str) -> String {
    endpoint
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or("-")
        .to_string()
}

/// Print the run header before the pipeline starts.
pub fn print_run_header(host: &Hostname, backend: &str) {
    println!();
    println!(
        "{} {} v{}",
        style("Starting").cyan(),
        style("sslscan-etl").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(
        "{} Target: {}",
        style("•").dim(),
        style(host).white().bold()
    );
    println!("{} Store: {}", style("•").dim(), style(backend).yellow());
    println!();
}

/// Print the progress line for a stage.
pub fn print_stage(stage: Stage) {
    println!("{} {}", style("→").cyan(), stage);
}

/// Print the closing line of a run.
pub fn print_completed() {
    println!("{}", style("ETL process completed.").bold());
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}

/// Print an info message.
pub fn print_info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

/// Truncate a string to a maximum length, adding ellipsis if truncated.
fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
