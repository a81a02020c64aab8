//! Error types for sslscan-etl.
//!
//! Uses `thiserror` for ergonomic error definitions.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a single request to the assessment API.
///
/// Every variant is treated as transient by the extractor.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API returned HTTP {status}")]
    Status { status: u16 },

    #[error("response body is not valid JSON: {0}")]
    Decode(String),
}

/// Why the extractor gave up on a host.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("invalid API response structure: {0}")]
    InvalidStructure(String),

    #[error("empty payload returned by API")]
    EmptyPayload,

    #[error("failed to retrieve valid data after {attempts} attempts")]
    Exhausted { attempts: u32 },
}

/// Document store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to connect to document store: {0}")]
    Connect(String),

    #[error("failed to create unique index: {0}")]
    Index(String),

    #[error("insert failed: {0}")]
    Insert(String),

    #[error("failed to encode document: {0}")]
    Encode(String),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::Insert(err.to_string())
    }
}

impl From<bson::ser::Error> for StoreError {
    fn from(err: bson::ser::Error) -> Self {
        Self::Encode(err.to_string())
    }
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },

    #[error("failed to read env file {path}: {reason}")]
    EnvFile { path: PathBuf, reason: String },

    #[error("could not determine configuration directory")]
    DirectoryNotFound,
}

/// Errors from installing the tracing subscriber.
#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("failed to initialize logging: {0}")]
    Init(String),
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
