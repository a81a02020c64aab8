//! Assessment persistence.
//!
//! The [`Loader`] owns the write policy: one insert per run, duplicates are
//! an expected outcome, every other failure is reported and never retried.
//! Backends plug in through [`StoreConnector`] and [`DocumentStore`].

mod document;
mod memory;
mod mongo;

pub use document::{StorageDocument, UniqueKey};
pub use memory::{MemoryConnector, MemoryStats};
pub use mongo::{MongoConnector, DUPLICATE_KEY_CODE, UNIQUE_INDEX_NAME};

use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use std::fmt;
use tracing::{debug, error, info};

/// Result of a single insert attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Stored under the given id.
    Inserted(String),
    /// Rejected by the unique index.
    Duplicate,
}

/// An open connection to a document collection.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create the unique `(hostname, status, ingested_at)` index.
    ///
    /// Must be a no-op when an equivalent index already exists.
    async fn ensure_unique_index(&self) -> StoreResult<()>;

    /// Insert one document.
    async fn insert(&self, document: &StorageDocument) -> StoreResult<InsertOutcome>;

    /// Release the connection.
    async fn close(self: Box<Self>);
}

/// Opens connections to a document store.
#[async_trait]
pub trait StoreConnector: Send + Sync {
    /// Short backend name for logs.
    fn backend(&self) -> &'static str;

    /// Open a new connection.
    async fn connect(&self) -> StoreResult<Box<dyn DocumentStore>>;
}

/// What the loader did with a document.
#[derive(Debug)]
pub enum LoadOutcome {
    /// No document was given; the store was not contacted.
    NothingToLoad,
    /// The document was stored.
    Inserted {
        /// Identifier assigned by the store.
        id: String,
    },
    /// An identical `(hostname, status, ingested_at)` already existed.
    Duplicate,
    /// Connecting, indexing or inserting failed.
    Failed(StoreError),
}

impl LoadOutcome {
    /// Whether the run's data is in the store (newly or already).
    pub fn is_persisted(&self) -> bool {
        matches!(self, Self::Inserted { .. } | Self::Duplicate)
    }
}

impl fmt::Display for LoadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NothingToLoad => write!(f, "no data to load"),
            Self::Inserted { id } => write!(f, "data inserted with ID: {}", id),
            Self::Duplicate => write!(f, "duplicate entry detected, skipping insertion"),
            Self::Failed(e) => write!(f, "insert failed: {}", e),
        }
    }
}

/// Loads documents into a store, one connection per call.
pub struct Loader<'a> {
    connector: &'a dyn StoreConnector,
    index_ready: bool,
}

impl<'a> Loader<'a> {
    /// Create a loader over `connector`.
    pub fn new(connector: &'a dyn StoreConnector) -> Self {
        Self {
            connector,
            index_ready: false,
        }
    }

    /// Whether the unique index has been provisioned by this loader.
    pub fn index_ready(&self) -> bool {
        self.index_ready
    }

    /// Provision the unique index on its own connection.
    ///
    /// Runs at most once per loader; later calls return immediately.
    pub async fn provision(&mut self) -> StoreResult<()> {
        if self.index_ready {
            return Ok(());
        }

        let store = self.connector.connect().await?;
        let result = self.ensure_index(store.as_ref()).await;
        store.close().await;
        result
    }

    /// Persist `document`, if there is one.
    ///
    /// Opens a connection, makes sure the unique index exists, attempts a
    /// single insert and closes the connection on every path.
    pub async fn load(&mut self, document: Option<&StorageDocument>) -> LoadOutcome {
        let Some(document) = document else {
            info!("no data to load");
            return LoadOutcome::NothingToLoad;
        };

        let store = match self.connector.connect().await {
            Ok(store) => store,
            Err(e) => {
                error!(backend = self.connector.backend(), error = %e, "store connection failed");
                return LoadOutcome::Failed(e);
            }
        };

        let outcome = self.load_into(store.as_ref(), document).await;
        store.close().await;
        outcome
    }

    async fn load_into(
        &mut self,
        store: &dyn DocumentStore,
        document: &StorageDocument,
    ) -> LoadOutcome {
        if let Err(e) = self.ensure_index(store).await {
            error!(error = %e, "unique index provisioning failed");
            return LoadOutcome::Failed(e);
        }

        match store.insert(document).await {
            Ok(InsertOutcome::Inserted(id)) => {
                info!(%id, host = %document.hostname, "document inserted");
                LoadOutcome::Inserted { id }
            }
            Ok(InsertOutcome::Duplicate) => {
                info!(host = %document.hostname, "duplicate entry detected, skipping insertion");
                LoadOutcome::Duplicate
            }
            Err(e) => {
                error!(host = %document.hostname, error = %e, "insert failed");
                LoadOutcome::Failed(e)
            }
        }
    }

    async fn ensure_index(&mut self, store: &dyn DocumentStore) -> StoreResult<()> {
        if self.index_ready {
            return Ok(());
        }
        store.ensure_unique_index().await?;
        debug!(backend = self.connector.backend(), "unique index ready");
        self.index_ready = true;
        Ok(())
    }
}
