//! # sslscan-etl - SSL Labs assessments into MongoDB
//!
//! Fetches the TLS assessment of one host from the SSL Labs API, reshapes it
//! into a storage document and inserts it into a MongoDB collection, once per
//! invocation.
//!
//! ## Features
//!
//! - **Bounded Retry**: connectivity failures and rate-limit replies are
//!   retried a fixed number of times with a fixed delay
//! - **Structural Validation**: malformed or empty assessments are rejected
//!   without retrying
//! - **Duplicate Avoidance**: a unique `(hostname, status, ingested_at)` index
//!   turns repeated inserts into a reported, non-fatal outcome
//! - **Typed Outcomes**: every stage reports what happened instead of only logging it
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use sslscan_etl::api::SslLabsClient;
//! use sslscan_etl::config::ApiSettings;
//! use sslscan_etl::extract::RetryPolicy;
//! use sslscan_etl::pipeline;
//! use sslscan_etl::storage::MemoryConnector;
//! use sslscan_etl::types::Hostname;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let host = Hostname::parse("www.ssllabs.com").unwrap();
//!     let api = SslLabsClient::from_settings(&ApiSettings::default()).unwrap();
//!     let store = MemoryConnector::new();
//!
//!     let report = pipeline::run(&host, &api, RetryPolicy::default(), &store, |_| {}).await;
//!     println!("{}", report.load);
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`api`] - The assessment API client and the `ScanApi` trait
//! - [`extract`] - Retry state machine producing a validated [`ScanResult`]
//! - [`transform`] - Pure mapping to a [`StorageDocument`]
//! - [`storage`] - The loader, its write policy and the store backends
//! - [`pipeline`] - Runs the three stages for one host
//! - [`config`] - Settings from the environment and env files
//! - [`error`] - Error types

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod scan;
pub mod storage;
pub mod transform;
pub mod types;

// Re-export commonly used types
pub use error::{ApiError, ConfigError, ExtractError, LoggingError, StoreError};
pub use extract::{Extractor, RetryPolicy};
pub use pipeline::{RunReport, RunStatus};
pub use scan::ScanResult;
pub use storage::{LoadOutcome, Loader, StorageDocument};
pub use types::{AssessmentStatus, Hostname, RunId};
