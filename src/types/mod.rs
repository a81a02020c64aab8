//! Core type definitions using newtype patterns for type safety.
//!
//! These types keep unvalidated input out of the pipeline.

mod hostname;
mod run_id;
mod status;

pub use hostname::{Hostname, HostnameError};
pub use run_id::RunId;
pub use status::AssessmentStatus;
