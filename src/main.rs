//! sslscan-etl: fetch one SSL Labs assessment and store it.

use anyhow::Context;
use clap::Parser;
use sslscan_etl::api::SslLabsClient;
use sslscan_etl::cli::{Args, OutputFormat};
use sslscan_etl::config::{load_env_file, Settings};
use sslscan_etl::pipeline::{self, RunStatus};
use sslscan_etl::storage::{MemoryConnector, MongoConnector, StoreConnector};
use sslscan_etl::{logging, output};
use std::process::ExitCode;
use tracing::debug;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = logging::init_logging(args.verbose, args.quiet) {
        output::print_warning(&e.to_string());
    }

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            ExitCode::from(1)
        }
    }
}

async fn run(args: Args) -> anyhow::Result<ExitCode> {
    if let Some(path) = load_env_file(args.env_file.as_deref()).context("loading env file")? {
        debug!(path = %path.display(), "env file loaded");
    }
    let settings = Settings::from_env().context("reading settings")?;
    debug!(?settings, "settings loaded");

    let connector: Box<dyn StoreConnector> = if args.dry_run {
        Box::new(MemoryConnector::new())
    } else {
        Box::new(MongoConnector::new(settings.require_mongo()?.clone()))
    };
    let api = SslLabsClient::from_settings(&settings.api).context("building HTTP client")?;

    let progress = args.output == OutputFormat::Plain && !args.quiet;
    if progress {
        output::print_run_header(&args.hostname, connector.backend());
    }

    let report = pipeline::run(
        &args.hostname,
        &api,
        settings.api.retry,
        connector.as_ref(),
        |stage| {
            if progress {
                output::print_stage(stage);
            }
        },
    )
    .await;

    if args.output == OutputFormat::Json || !args.quiet {
        output::print_report(&report, args.output).context("writing report")?;
    }

    if progress {
        match report.status() {
            RunStatus::NoData => output::print_warning(&format!(
                "no assessment stored for {}",
                report.host
            )),
            _ if args.dry_run => {
                output::print_info("dry run: the document was kept in memory only")
            }
            _ => {}
        }
        output::print_completed();
    }

    Ok(report.status().into())
}
