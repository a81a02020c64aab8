//! Assessment status reported by the API.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of an SSL Labs assessment.
///
/// Unknown values are kept verbatim so the stored document always carries
/// exactly what the API sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AssessmentStatus {
    /// Resolving the hostname.
    Dns,
    /// Assessment running.
    InProgress,
    /// Assessment complete.
    Ready,
    /// Assessment failed.
    Error,
    /// Any other value, including an absent status (empty string).
    Other(String),
}

impl AssessmentStatus {
    /// The status string as sent by the API.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Dns => "DNS",
            Self::InProgress => "IN_PROGRESS",
            Self::Ready => "READY",
            Self::Error => "ERROR",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for AssessmentStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "DNS" => Self::Dns,
            "IN_PROGRESS" => Self::InProgress,
            "READY" => Self::Ready,
            "ERROR" => Self::Error,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for AssessmentStatus {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<AssessmentStatus> for String {
    fn from(status: AssessmentStatus) -> Self {
        match status {
            AssessmentStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for AssessmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
