//! The extract, transform and load sequence for one host.

use crate::api::ScanApi;
use crate::error::ExtractError;
use crate::extract::{Extractor, RetryPolicy};
use crate::storage::{LoadOutcome, Loader, StorageDocument, StoreConnector};
use crate::transform::transform;
use crate::types::{Hostname, RunId};
use std::fmt;
use std::process::ExitCode;
use tracing::{info, info_span, Instrument};

/// Pipeline stage, reported as each one starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extract,
    Transform,
    Load,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extract => write!(f, "Extracting data..."),
            Self::Transform => write!(f, "Transforming data..."),
            Self::Load => write!(f, "Loading into MongoDB..."),
        }
    }
}

/// Overall result of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// A new document was stored.
    Stored,
    /// The document already existed.
    AlreadyStored,
    /// Extraction produced nothing to store.
    NoData,
    /// The store rejected or could not take the document.
    StoreFailed,
}

impl RunStatus {
    /// Process exit code for this status.
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Stored | Self::AlreadyStored => 0,
            Self::StoreFailed => 1,
            Self::NoData => 2,
        }
    }
}

impl From<RunStatus> for ExitCode {
    fn from(status: RunStatus) -> Self {
        ExitCode::from(status.exit_code())
    }
}

/// Everything that happened in one run.
#[derive(Debug)]
pub struct RunReport {
    /// Identifier of this run.
    pub run_id: RunId,
    /// Host that was assessed.
    pub host: Hostname,
    /// Why extraction failed, if it did.
    pub extract_error: Option<ExtractError>,
    /// The document handed to the loader.
    pub document: Option<StorageDocument>,
    /// What the loader did.
    pub load: LoadOutcome,
}

impl RunReport {
    /// Collapse the report to a status.
    pub fn status(&self) -> RunStatus {
        match &self.load {
            LoadOutcome::Inserted { .. } => RunStatus::Stored,
            LoadOutcome::Duplicate => RunStatus::AlreadyStored,
            LoadOutcome::NothingToLoad => RunStatus::NoData,
            LoadOutcome::Failed(_) => RunStatus::StoreFailed,
        }
    }
}

/// Run the pipeline for `host`.
///
/// `on_stage` is called as each stage begins.
pub async fn run<F>(
    host: &Hostname,
    api: &dyn ScanApi,
    policy: RetryPolicy,
    connector: &dyn StoreConnector,
    on_stage: F,
) -> RunReport
where
    F: FnMut(Stage),
{
    let run_id = RunId::new();
    let span = info_span!("etl_run", run_id = %run_id.short(), host = %host);

    run_stages(run_id, host, api, policy, connector, on_stage)
        .instrument(span)
        .await
}

async fn run_stages<F>(
    run_id: RunId,
    host: &Hostname,
    api: &dyn ScanApi,
    policy: RetryPolicy,
    connector: &dyn StoreConnector,
    mut on_stage: F,
) -> RunReport
where
    F: FnMut(Stage),
{
    info!(backend = connector.backend(), "run started");

    on_stage(Stage::Extract);
    let extracted = Extractor::new(api, policy).extract(host).await;
    let (scan, extract_error) = match extracted {
        Ok(scan) => (Some(scan), None),
        Err(e) => (None, Some(e)),
    };

    on_stage(Stage::Transform);
    let document = transform(scan);

    on_stage(Stage::Load);
    let load = Loader::new(connector).load(document.as_ref()).await;

    let report = RunReport {
        run_id,
        host: host.clone(),
        extract_error,
        document,
        load,
    };
    info!(status = ?report.status(), "run finished");
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{Reply, ScriptedApi};
    use crate::storage::MemoryConnector;
    use serde_json::json;
    use std::time::Duration;
    use tokio::time::Instant;

    fn host() -> Hostname {
        Hostname::parse("www.ssllabs.com").unwrap()
    }

    fn valid_body() -> serde_json::Value {
        json!({
            "host": "www.ssllabs.com",
            "status": "READY",
            "endpoints": [
                { "ipAddress": "64.41.200.100", "grade": "A+" },
                { "ipAddress": "2600:c02:1020:4202::ac10:8267", "grade": "A+" }
            ]
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_then_success_stores_one_document() {
        let api = ScriptedApi::new(vec![
            Reply::Body(json!({ "errors": [{ "message": "Rate limit exceeded" }] })),
            Reply::Body(valid_body()),
        ]);
        let connector = MemoryConnector::new();
        let mut stages = Vec::new();
        let start = Instant::now();

        let report = run(&host(), &api, RetryPolicy::default(), &connector, |stage| {
            stages.push(stage)
        })
        .await;

        assert_eq!(report.status(), RunStatus::Stored);
        assert_eq!(api.calls(), 2);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(5) && elapsed < Duration::from_secs(10));
        assert_eq!(stages, vec![Stage::Extract, Stage::Transform, Stage::Load]);

        let stored = connector.documents();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].1.hostname, "www.ssllabs.com");
        assert_eq!(stored[0].1.endpoints.len(), 2);
        assert_eq!(Some(&stored[0].1), report.document.as_ref());
    }

    #[tokio::test(start_paused = true)]
    async fn test_extraction_failure_skips_store() {
        let api = ScriptedApi::new(vec![]);
        let connector = MemoryConnector::new();

        let report = run(&host(), &api, RetryPolicy::default(), &connector, |_| {}).await;

        assert_eq!(report.status(), RunStatus::NoData);
        assert_eq!(report.status().exit_code(), 2);
        assert_eq!(
            report.extract_error,
            Some(ExtractError::Exhausted { attempts: 3 })
        );
        assert!(report.document.is_none());
        assert_eq!(connector.stats().connections, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_payload_reports_cause() {
        let api = ScriptedApi::new(vec![Reply::Body(json!({ "unexpected": true }))]);
        let connector = MemoryConnector::new();

        let report = run(&host(), &api, RetryPolicy::default(), &connector, |_| {}).await;

        assert!(matches!(
            report.extract_error,
            Some(ExtractError::InvalidStructure(_))
        ));
        assert!(matches!(report.load, LoadOutcome::NothingToLoad));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(RunStatus::Stored.exit_code(), 0);
        assert_eq!(RunStatus::AlreadyStored.exit_code(), 0);
        assert_eq!(RunStatus::StoreFailed.exit_code(), 1);
        assert_eq!(RunStatus::NoData.exit_code(), 2);
    }

    #[test]
    fn test_stage_messages() {
        assert_eq!(Stage::Extract.to_string(), "Extracting data...");
        assert_eq!(Stage::Load.to_string(), "Loading into MongoDB...");
    }
}
