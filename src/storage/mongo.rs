//! MongoDB backend.
//!
//! Each connection owns its own `Client`, created on `connect` and shut
//! down on `close`; nothing is pooled across loads.

use super::{DocumentStore, InsertOutcome, StorageDocument, StoreConnector};
use crate::config::{redact_uri, MongoSettings};
use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use bson::{doc, Bson, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, IndexModel};
use tracing::debug;

/// Server error code for a unique index violation.
pub const DUPLICATE_KEY_CODE: i32 = 11000;

/// Name of the unique `(hostname, status, ingested_at)` index.
pub const UNIQUE_INDEX_NAME: &str = "hostname_1_status_1_ingested_at_1";

/// Opens MongoDB connections from [`MongoSettings`].
#[derive(Debug, Clone)]
pub struct MongoConnector {
    settings: MongoSettings,
}

impl MongoConnector {
    /// Create a connector.
    pub fn new(settings: MongoSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl StoreConnector for MongoConnector {
    fn backend(&self) -> &'static str {
        "mongodb"
    }

    async fn connect(&self) -> StoreResult<Box<dyn DocumentStore>> {
        let mut options = ClientOptions::parse(&self.settings.uri)
            .await
            .map_err(|e| StoreError::Connect(e.to_string()))?;
        options.app_name = Some(concat!("sslscan-etl/", env!("CARGO_PKG_VERSION")).to_string());

        let client =
            Client::with_options(options).map_err(|e| StoreError::Connect(e.to_string()))?;
        let collection = client
            .database(&self.settings.database)
            .collection::<Document>(&self.settings.collection);

        debug!(
            uri = %redact_uri(&self.settings.uri),
            database = %self.settings.database,
            collection = %self.settings.collection,
            "mongodb client created"
        );

        Ok(Box::new(MongoStore { client, collection }))
    }
}

/// One MongoDB client bound to the target collection.
struct MongoStore {
    client: Client,
    collection: Collection<Document>,
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn ensure_unique_index(&self) -> StoreResult<()> {
        let options = IndexOptions::builder()
            .unique(true)
            .name(UNIQUE_INDEX_NAME.to_string())
            .build();
        let model = IndexModel::builder()
            .keys(unique_index_keys())
            .options(options)
            .build();

        self.collection
            .create_index(model)
            .await
            .map_err(|e| StoreError::Index(e.to_string()))?;
        Ok(())
    }

    async fn insert(&self, document: &StorageDocument) -> StoreResult<InsertOutcome> {
        let encoded = document.to_bson_document()?;

        match self.collection.insert_one(encoded).await {
            Ok(result) => Ok(InsertOutcome::Inserted(format_id(&result.inserted_id))),
            Err(e) if is_duplicate_key(&e) => Ok(InsertOutcome::Duplicate),
            Err(e) => Err(e.into()),
        }
    }

    async fn close(self: Box<Self>) {
        self.client.shutdown().await;
        debug!("mongodb client shut down");
    }
}

/// Keys of the unique index, in order.
pub(crate) fn unique_index_keys() -> Document {
    doc! { "hostname": 1, "status": 1, "ingested_at": 1 }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE
    )
}

fn format_id(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::oid::ObjectId;

    #[test]
    fn test_unique_index_keys_order() {
        let index_keys = unique_index_keys();
        let keys: Vec<&str> = index_keys.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["hostname", "status", "ingested_at"]);
    }

    #[test]
    fn test_index_name_matches_keys() {
        let derived = unique_index_keys()
            .iter()
            .map(|(k, v)| format!("{}_{}", k, v))
            .collect::<Vec<_>>()
            .join("_");
        assert_eq!(derived, UNIQUE_INDEX_NAME);
    }

    #[test]
    fn test_format_object_id() {
        let oid = ObjectId::new();
        assert_eq!(format_id(&Bson::ObjectId(oid)), oid.to_hex());
        assert_eq!(format_id(&Bson::String("abc".to_string())), "abc");
    }

    #[tokio::test]
    async fn test_invalid_uri_fails_to_connect() {
        let connector = MongoConnector::new(MongoSettings {
            uri: "not-a-mongo-uri".to_string(),
            database: "security".to_string(),
            collection: "ssllabs_analyze_raw".to_string(),
        });

        let err = connector.connect().await.err().unwrap();
        assert!(matches!(err, StoreError::Connect(_)));
    }
}
