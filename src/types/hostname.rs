//! Validated hostname for assessment requests.
//!
//! The assessment API takes a bare DNS name. `Hostname` rejects the common
//! mistakes (URLs, paths, embedded whitespace) before any request is made.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A bare hostname such as `www.ssllabs.com`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Hostname(String);

impl Hostname {
    /// Maximum length of a DNS name.
    pub const MAX_LEN: usize = 253;

    /// Parse and validate a hostname.
    pub fn parse(input: &str) -> Result<Self, HostnameError> {
        let host = input.trim();

        if host.is_empty() {
            return Err(HostnameError::Empty);
        }
        if host.len() > Self::MAX_LEN {
            return Err(HostnameError::TooLong(host.len()));
        }
        if host.contains("://") {
            return Err(HostnameError::HasScheme(host.to_string()));
        }
        if host.contains('/') {
            return Err(HostnameError::HasPath(host.to_string()));
        }
        if host.chars().any(char::is_whitespace) {
            return Err(HostnameError::InvalidCharacter(host.to_string()));
        }

        Ok(Self(host.to_string()))
    }

    /// Get the hostname as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Hostname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Hostname {
    type Err = HostnameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Hostname {
    type Error = HostnameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Hostname> for String {
    fn from(host: Hostname) -> Self {
        host.0
    }
}

impl AsRef<str> for Hostname {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Error type for hostname validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostnameError {
    #[error("hostname is empty")]
    Empty,
    #[error("hostname is {0} characters long (max 253)")]
    TooLong(usize),
    #[error("'{0}' looks like a URL; pass the bare hostname")]
    HasScheme(String),
    #[error("'{0}' contains a path; pass the bare hostname")]
    HasPath(String),
    #[error("'{0}' contains whitespace")]
    InvalidCharacter(String),
}
