//! In-memory Store - Volatile Document Collections
//!
//! Same semantics as the file store without touching disk. Used for
//! ephemeral sessions (`--ephemeral`) and as the fixture behind
//! repository tests.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::ports::store::{Collection, PersistentStore, StoreError};

/// Volatile implementation of the `PersistentStore` port.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, BTreeMap<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in `collection`.
    pub async fn count(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .await
            .get(&collection)
            .map_or(0, BTreeMap::len)
    }
}

#[async_trait]
impl PersistentStore for MemoryStore {
    async fn open_collection(&self, collection: Collection) -> Result<(), StoreError> {
        self.collections.write().await.entry(collection).or_default();
        Ok(())
    }

    async fn get_all(&self, collection: Collection) -> Result<Vec<Value>, StoreError> {
        Ok(self
            .collections
            .read()
            .await
            .get(&collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn put(
        &self,
        collection: Collection,
        key: &str,
        document: Value,
    ) -> Result<(), StoreError> {
        self.collections
            .write()
            .await
            .entry(collection)
            .or_default()
            .insert(key.to_string(), document);
        Ok(())
    }

    async fn delete(&self, collection: Collection, key: &str) -> Result<(), StoreError> {
        if let Some(docs) = self.collections.write().await.get_mut(&collection) {
            docs.remove(key);
        }
        Ok(())
    }

    async fn clear(&self, collection: Collection) -> Result<(), StoreError> {
        self.collections
            .write()
            .await
            .entry(collection)
            .or_default()
            .clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_collections_are_independent() {
        let store = MemoryStore::new();
        store
            .put(Collection::Products, "1", json!({"id": "1"}))
            .await
            .unwrap();

        assert_eq!(store.count(Collection::Products).await, 1);
        assert_eq!(store.count(Collection::Orders).await, 0);
        assert!(store.get_all(Collection::Orders).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_on_unopened_collection() {
        let store = MemoryStore::new();
        store.delete(Collection::Orders, "nope").await.unwrap();
        assert_eq!(store.count(Collection::Orders).await, 0);
    }
}
