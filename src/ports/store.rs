//! Persistent Store Port - Keyed Document Collections
//!
//! Defines the trait for the durable key-value store behind the catalog.
//! The store holds two named collections of JSON documents, each keyed by
//! a unique string identifier. Ordering of `get_all` is unspecified at
//! this layer; repositories sort as they need.

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

/// The named collections the store must provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Products,
    Orders,
}

impl Collection {
    /// Every collection, in creation order.
    pub const ALL: [Self; 2] = [Self::Products, Self::Orders];

    /// Stable collection name, also used as the legacy flat-storage key.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Orders => "orders",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Storage engine failure. Always propagated, never swallowed.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open collection `{collection}`: {source}")]
    Open {
        collection: Collection,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read collection `{collection}`: {source}")]
    Read {
        collection: Collection,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write collection `{collection}`: {source}")]
    Write {
        collection: Collection,
        #[source]
        source: std::io::Error,
    },
    #[error("collection `{collection}` is not a valid document map: {source}")]
    Corrupt {
        collection: Collection,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode document `{key}`: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("storage engine unavailable at {}: {source}", .path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Trait for durable, asynchronous keyed collections.
///
/// Every operation is atomic for a single entry only. Implementations
/// create missing collections lazily on first use; `open_collection` may
/// be called any number of times, concurrently, without creating
/// duplicates or losing data.
#[async_trait]
pub trait PersistentStore: Send + Sync + 'static {
    /// Ensure `collection` exists. Idempotent.
    async fn open_collection(&self, collection: Collection) -> Result<(), StoreError>;

    /// All documents in `collection`.
    async fn get_all(&self, collection: Collection) -> Result<Vec<Value>, StoreError>;

    /// Insert or replace the document stored under `key`.
    async fn put(&self, collection: Collection, key: &str, document: Value)
    -> Result<(), StoreError>;

    /// Remove the document under `key`. Absent keys are a no-op.
    async fn delete(&self, collection: Collection, key: &str) -> Result<(), StoreError>;

    /// Remove every document in `collection`.
    async fn clear(&self, collection: Collection) -> Result<(), StoreError>;
}

/// Serialize an entity into a store document.
pub fn encode_document<T: Serialize>(key: &str, entity: &T) -> Result<Value, StoreError> {
    serde_json::to_value(entity).map_err(|source| StoreError::Encode {
        key: key.to_string(),
        source,
    })
}

/// Decode store documents, skipping (and logging) any that don't match `T`.
pub fn decode_documents<T: DeserializeOwned>(collection: Collection, documents: Vec<Value>) -> Vec<T> {
    documents
        .into_iter()
        .filter_map(|doc| match serde_json::from_value::<T>(doc) {
            Ok(entity) => Some(entity),
            Err(e) => {
                warn!(
                    collection = %collection,
                    error = %e,
                    "Skipping malformed document"
                );
                None
            }
        })
        .collect()
}
