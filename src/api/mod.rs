//! Assessment API abstraction.
//!
//! The extractor talks to the API only through [`ScanApi`], so the retry
//! logic can be driven by a scripted client in tests.

mod ssllabs;

pub use ssllabs::SslLabsClient;

use crate::error::ApiError;
use crate::types::Hostname;
use async_trait::async_trait;
use serde_json::Value;

/// Marker the API puts in an error message when the caller is throttled.
pub const RATE_LIMIT_MARKER: &str = "Rate limit";

/// Trait for assessment API clients.
#[async_trait]
pub trait ScanApi: Send + Sync {
    /// Fetch the assessment for `host`, preferring cached results and
    /// asking for complete endpoint details.
    ///
    /// Returns the decoded JSON body as-is; interpreting it is the
    /// extractor's job.
    async fn analyze(&self, host: &Hostname) -> Result<Value, ApiError>;
}

/// Check whether a response body reports a rate-limit error.
///
/// The API signals throttling with an `errors` array whose entries carry a
/// `message` string.
pub fn is_rate_limited(body: &Value) -> bool {
    body.get("errors")
        .and_then(Value::as_array)
        .is_some_and(|errors| {
            errors.iter().any(|err| {
                err.get("message")
                    .and_then(Value::as_str)
                    .is_some_and(|msg| msg.contains(RATE_LIMIT_MARKER))
            })
        })
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rate_limit_detected() {
        let body = json!({
            "errors": [{ "message": "Rate limit exceeded, please slow down" }]
        });
        assert!(is_rate_limited(&body));
    }

    #[test]
    fn test_other_errors_are_not_rate_limits() {
        let body = json!({ "errors": [{ "field": "host", "message": "Unable to resolve" }] });
        assert!(!is_rate_limited(&body));
        assert!(!is_rate_limited(&json!({ "host": "example.com" })));
        assert!(!is_rate_limited(&json!([1, 2, 3])));
    }

    #[test]
    fn test_malformed_error_entries_ignored() {
        let body = json!({ "errors": [{ "message": 42 }, "Rate limit"] });
        assert!(!is_rate_limited(&body));
    }
}
