//! Configuration management for sslscan-etl.
//!
//! Settings come from the environment and env files, and are passed
//! explicitly into the stages that need them.

mod settings;

pub use settings::{
    load_env_file, redact_uri, ApiSettings, MongoSettings, Paths, Settings, DEFAULT_API_URL,
    DEFAULT_COLLECTION, DEFAULT_TIMEOUT_SECS,
};
