//! Transformation stage: scan result to storage document.
//!
//! Pure apart from reading the clock.

use crate::scan::ScanResult;
use crate::storage::StorageDocument;
use chrono::{DateTime, SubsecRound, Utc};

/// Build the storage document for `scan`, stamped with the current time.
///
/// Returns `None` when there is nothing to transform.
pub fn transform(scan: Option<ScanResult>) -> Option<StorageDocument> {
    scan.map(|scan| transform_at(scan, Utc::now()))
}

/// Build the storage document for `scan`, stamped with `at`.
///
/// The timestamp is truncated to milliseconds, the precision MongoDB keeps,
/// so the document compares equal to what ends up stored.
pub fn transform_at(scan: ScanResult, at: DateTime<Utc>) -> StorageDocument {
    let (hostname, status, endpoints, raw) = scan.into_parts();

    StorageDocument {
        hostname,
        status,
        endpoints,
        raw,
        ingested_at: at.trunc_subsecs(3),
    }
}
