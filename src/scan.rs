//! Validated assessment response.

use crate::error::ExtractError;
use crate::types::AssessmentStatus;
use serde_json::Value;

/// An assessment response that passed structural validation.
///
/// The only way to build one is [`ScanResult::validate`], so holding a
/// `ScanResult` means `host` is a string and `endpoints` is non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanResult {
    host: String,
    status: AssessmentStatus,
    endpoints: Vec<Value>,
    raw: Value,
}

impl ScanResult {
    /// Validate a decoded API body.
    ///
    /// Fails with [`ExtractError::InvalidStructure`] when the body is not an
    /// object, lacks a string `host`, or has a non-array `endpoints`; and with
    /// [`ExtractError::EmptyPayload`] when `endpoints` is missing, null or
    /// empty. Neither failure is worth retrying.
    ///
    /// A missing or non-string `status` is kept as the empty string
    /// (`AssessmentStatus::Other("")`), never as null.
    pub fn validate(body: Value) -> Result<Self, ExtractError> {
        let Some(object) = body.as_object() else {
            return Err(ExtractError::InvalidStructure(
                "response is not a JSON object".to_string(),
            ));
        };

        let host = match object.get("host") {
            Some(Value::String(host)) => host.clone(),
            Some(_) => {
                return Err(ExtractError::InvalidStructure(
                    "'host' is not a string".to_string(),
                ))
            }
            None => {
                return Err(ExtractError::InvalidStructure(
                    "missing 'host' key".to_string(),
                ))
            }
        };

        let endpoints = match object.get("endpoints") {
            None | Some(Value::Null) => return Err(ExtractError::EmptyPayload),
            Some(Value::Array(endpoints)) if endpoints.is_empty() => {
                return Err(ExtractError::EmptyPayload)
            }
            Some(Value::Array(endpoints)) => endpoints.clone(),
            Some(_) => {
                return Err(ExtractError::InvalidStructure(
                    "'endpoints' is not an array".to_string(),
                ))
            }
        };

        let status = object
            .get("status")
            .and_then(Value::as_str)
            .map(AssessmentStatus::from)
            .unwrap_or_else(|| AssessmentStatus::Other(String::new()));

        Ok(Self {
            host,
            status,
            endpoints,
            raw: body,
        })
    }

    /// Hostname the API assessed.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Assessment status.
    pub fn status(&self) -> &AssessmentStatus {
        &self.status
    }

    /// Endpoint records, in API order.
    pub fn endpoints(&self) -> &[Value] {
        &self.endpoints
    }

    /// The full response body.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Split into owned parts: host, status, endpoints, raw body.
    pub fn into_parts(self) -> (String, AssessmentStatus, Vec<Value>, Value) {
        (self.host, self.status, self.endpoints, self.raw)
    }
}
