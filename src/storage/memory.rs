//! In-process document store.
//!
//! Enforces the same unique index as MongoDB once it has been created.
//! Backs `--dry-run` and the loader tests.

use super::{DocumentStore, InsertOutcome, StorageDocument, StoreConnector, UniqueKey};
use crate::error::StoreResult;
use async_trait::async_trait;
use bson::oid::ObjectId;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct State {
    documents: Vec<(String, StorageDocument)>,
    keys: HashSet<UniqueKey>,
    index_created: bool,
    connections: u32,
    closed: u32,
    index_calls: u32,
}

/// Counters describing what has happened to a memory store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryStats {
    /// Stored documents.
    pub documents: usize,
    /// Connections opened.
    pub connections: u32,
    /// Connections closed.
    pub closed: u32,
    /// Calls to `ensure_unique_index`.
    pub index_calls: u32,
}

/// Connector for a shared in-memory collection.
///
/// Every connection sees the same documents.
#[derive(Debug, Clone, Default)]
pub struct MemoryConnector {
    state: Arc<Mutex<State>>,
}

impl MemoryConnector {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> MemoryStats {
        let state = lock(&self.state);
        MemoryStats {
            documents: state.documents.len(),
            connections: state.connections,
            closed: state.closed,
            index_calls: state.index_calls,
        }
    }

    /// Stored documents with their ids, in insertion order.
    pub fn documents(&self) -> Vec<(String, StorageDocument)> {
        lock(&self.state).documents.clone()
    }
}

#[async_trait]
impl StoreConnector for MemoryConnector {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn connect(&self) -> StoreResult<Box<dyn DocumentStore>> {
        lock(&self.state).connections += 1;
        Ok(Box::new(MemoryStore {
            state: Arc::clone(&self.state),
        }))
    }
}

/// A connection to a [`MemoryConnector`]'s collection.
struct MemoryStore {
    state: Arc<Mutex<State>>,
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn ensure_unique_index(&self) -> StoreResult<()> {
        let mut state = lock(&self.state);
        state.index_calls += 1;
        state.index_created = true;
        Ok(())
    }

    async fn insert(&self, document: &StorageDocument) -> StoreResult<InsertOutcome> {
        // Round-trip through BSON so encoding failures surface as they would in MongoDB.
        document.to_bson_document()?;

        let mut state = lock(&self.state);
        let key = document.unique_key();
        if state.index_created && state.keys.contains(&key) {
            return Ok(InsertOutcome::Duplicate);
        }

        let id = ObjectId::new().to_hex();
        state.keys.insert(key);
        state.documents.push((id.clone(), document.clone()));
        Ok(InsertOutcome::Inserted(id))
    }

    async fn close(self: Box<Self>) {
        lock(&self.state).closed += 1;
    }
}

/// Lock the state, recovering from a poisoned mutex.
fn lock(state: &Mutex<State>) -> MutexGuard<'_, State> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AssessmentStatus;
    use chrono::Utc;
    use serde_json::json;

    fn document() -> StorageDocument {
        StorageDocument {
            hostname: "example.com".to_string(),
            status: AssessmentStatus::Ready,
            endpoints: vec![json!({ "ipAddress": "1.2.3.4" })],
            raw: json!({ "host": "example.com" }),
            ingested_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_duplicates_allowed_without_index() {
        let connector = MemoryConnector::new();
        let store = connector.connect().await.unwrap();
        let doc = document();

        assert!(matches!(store.insert(&doc).await.unwrap(), InsertOutcome::Inserted(_)));
        assert!(matches!(store.insert(&doc).await.unwrap(), InsertOutcome::Inserted(_)));
        assert_eq!(connector.stats().documents, 2);
    }

    #[tokio::test]
    async fn test_index_rejects_duplicates() {
        let connector = MemoryConnector::new();
        let store = connector.connect().await.unwrap();
        let doc = document();

        store.ensure_unique_index().await.unwrap();
        store.ensure_unique_index().await.unwrap();

        assert!(matches!(store.insert(&doc).await.unwrap(), InsertOutcome::Inserted(_)));
        assert_eq!(store.insert(&doc).await.unwrap(), InsertOutcome::Duplicate);
        assert_eq!(connector.stats().documents, 1);
        assert_eq!(connector.stats().index_calls, 2);
    }

    #[tokio::test]
    async fn test_connections_share_collection() {
        let connector = MemoryConnector::new();
        let first = connector.connect().await.unwrap();
        let second = connector.connect().await.unwrap();

        first.ensure_unique_index().await.unwrap();
        first.insert(&document()).await.unwrap();
        first.close().await;

        assert_eq!(connector.documents().len(), 1);
        second.close().await;

        let stats = connector.stats();
        assert_eq!(stats.connections, 2);
        assert_eq!(stats.closed, 2);
    }

    #[tokio::test]
    async fn test_unencodable_document_rejected() {
        let connector = MemoryConnector::new();
        let store = connector.connect().await.unwrap();
        let mut doc = document();
        doc.raw = json!({ "huge": u64::MAX });

        assert!(store.insert(&doc).await.is_err());
        assert_eq!(connector.stats().documents, 0);
    }
}
