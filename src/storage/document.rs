//! The normalized document persisted for each run.

use crate::error::StoreResult;
use crate::types::AssessmentStatus;
use bson::{doc, Bson, Document};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A stored assessment.
///
/// `(hostname, status, ingested_at)` is unique in the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageDocument {
    /// Hostname the API assessed.
    pub hostname: String,
    /// Assessment status at fetch time.
    pub status: AssessmentStatus,
    /// Endpoint records, in API order.
    pub endpoints: Vec<Value>,
    /// The complete API response.
    pub raw: Value,
    /// When the document was built, truncated to milliseconds.
    pub ingested_at: DateTime<Utc>,
}

/// Key covered by the unique index.
pub type UniqueKey = (String, String, DateTime<Utc>);

impl StorageDocument {
    /// The `(hostname, status, ingested_at)` triple.
    pub fn unique_key(&self) -> UniqueKey {
        (
            self.hostname.clone(),
            self.status.as_str().to_string(),
            self.ingested_at,
        )
    }

    /// Encode as BSON, with `ingested_at` as a native BSON datetime.
    pub fn to_bson_document(&self) -> StoreResult<Document> {
        Ok(doc! {
            "hostname": self.hostname.as_str(),
            "status": self.status.as_str(),
            "endpoints": bson::to_bson(&self.endpoints)?,
            "raw": bson::to_bson(&self.raw)?,
            "ingested_at": Bson::DateTime(bson::DateTime::from_chrono(self.ingested_at)),
        })
    }

    /// A one-line description for progress output.
    pub fn summary(&self) -> String {
        format!(
            "{} [{}] - {} endpoint(s), ingested {}",
            self.hostname,
            self.status,
            self.endpoints.len(),
            self.ingested_at.to_rfc3339()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn document() -> StorageDocument {
        StorageDocument {
            hostname: "example.com".to_string(),
            status: AssessmentStatus::Ready,
            endpoints: vec![json!({ "ipAddress": "1.2.3.4", "grade": "A+" })],
            raw: json!({
                "host": "example.com",
                "status": "READY",
                "endpoints": [{ "ipAddress": "1.2.3.4", "grade": "A+" }]
            }),
            ingested_at: Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_bson_encoding() {
        let doc = document();
        let encoded = doc.to_bson_document().unwrap();

        assert_eq!(encoded.get_str("hostname").unwrap(), "example.com");
        assert_eq!(encoded.get_str("status").unwrap(), "READY");
        assert_eq!(encoded.get_array("endpoints").unwrap().len(), 1);
        assert_eq!(
            encoded.get_document("raw").unwrap().get_str("host").unwrap(),
            "example.com"
        );
        assert_eq!(
            encoded.get_datetime("ingested_at").unwrap().to_chrono(),
            doc.ingested_at
        );
    }

    #[test]
    fn test_oversized_integer_fails_encoding() {
        let mut doc = document();
        doc.raw = json!({ "host": "example.com", "huge": u64::MAX });
        assert!(doc.to_bson_document().is_err());
    }

    #[test]
    fn test_unique_key() {
        let doc = document();
        let (host, status, at) = doc.unique_key();
        assert_eq!(host, "example.com");
        assert_eq!(status, "READY");
        assert_eq!(at, doc.ingested_at);
    }

    #[test]
    fn test_summary() {
        let summary = document().summary();
        assert!(summary.starts_with("example.com [READY] - 1 endpoint(s)"));
    }
}
