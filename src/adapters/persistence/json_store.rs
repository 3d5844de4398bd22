//! JSON File Store - Durable Document Collections on Disk
//!
//! Each collection is one `<name>.json` file holding a map of
//! identifier → document. Every write goes through a tmp file and an
//! atomic rename, so a collection file is always either the old or the
//! new version, never a partial write.
//!
//! Layout:
//! - `meta.json`: `{ "schema_version": N }`
//! - `products.json`: product documents keyed by id
//! - `orders.json`: order documents keyed by id

use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock, PoisonError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::fs;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info, instrument, warn};

use crate::ports::store::{Collection, PersistentStore, StoreError};

const META_FILE: &str = "meta.json";

type Documents = BTreeMap<String, Value>;

/// Write locks keyed by absolute data directory, shared by every store
/// in this process that points at the same directory.
static DIRECTORY_LOCKS: LazyLock<std::sync::Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>> =
    LazyLock::new(Default::default);

fn directory_lock(data_dir: &Path) -> Arc<Mutex<()>> {
    let key = std::path::absolute(data_dir).unwrap_or_else(|_| data_dir.to_path_buf());
    let mut locks = DIRECTORY_LOCKS
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    Arc::clone(locks.entry(key).or_default())
}

#[derive(Debug, Serialize, Deserialize)]
struct StoreMeta {
    schema_version: u32,
}

/// File-backed implementation of the `PersistentStore` port.
///
/// Initialization is lazy: the first operation creates the directory,
/// any missing collection files and the meta file. Schema upgrades only
/// ever add missing collections; existing files are never dropped.
///
/// Any number of stores may be opened on one directory within a process;
/// they share a write lock, so read-modify-write cycles never interleave.
/// Separate processes on the same directory are not coordinated.
pub struct JsonFileStore {
    /// Directory holding the collection files.
    data_dir: PathBuf,
    /// Schema version this build expects.
    schema_version: u32,
    /// Set once initialization has succeeded.
    ready: OnceCell<()>,
    /// Serializes read-modify-write cycles on `data_dir` within this process.
    write_lock: Arc<Mutex<()>>,
}

impl JsonFileStore {
    /// Create a store rooted at `data_dir`. Nothing touches disk yet.
    pub fn new(data_dir: impl Into<PathBuf>, schema_version: u32) -> Self {
        let data_dir = data_dir.into();
        Self {
            write_lock: directory_lock(&data_dir),
            data_dir,
            schema_version,
            ready: OnceCell::new(),
        }
    }

    fn collection_path(&self, collection: Collection) -> PathBuf {
        self.data_dir.join(format!("{}.json", collection.name()))
    }

    async fn ensure_ready(&self) -> Result<(), StoreError> {
        self.ready
            .get_or_try_init(|| async {
                let _guard = self.write_lock.lock().await;
                self.initialize().await
            })
            .await?;
        Ok(())
    }

    #[instrument(skip(self), fields(dir = %self.data_dir.display()))]
    async fn initialize(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|source| StoreError::Unavailable {
                path: self.data_dir.clone(),
                source,
            })?;

        let stored_version = self.read_meta().await?;

        for collection in Collection::ALL {
            let path = self.collection_path(collection);
            if fs::try_exists(&path)
                .await
                .map_err(|source| StoreError::Open { collection, source })?
            {
                continue;
            }
            self.write_documents(collection, &Documents::new())
                .await
                .map_err(|e| match e {
                    StoreError::Write { collection, source } => {
                        StoreError::Open { collection, source }
                    }
                    other => other,
                })?;
            info!(collection = %collection, "Created collection");
        }

        if stored_version.is_none_or(|v| v < self.schema_version) {
            self.write_meta().await?;
            info!(
                from = ?stored_version,
                to = self.schema_version,
                "Schema version upgraded"
            );
        } else if stored_version.is_some_and(|v| v > self.schema_version) {
            warn!(
                stored = ?stored_version,
                expected = self.schema_version,
                "Store was written by a newer schema, leaving it as is"
            );
        }

        Ok(())
    }

    async fn read_meta(&self) -> Result<Option<u32>, StoreError> {
        let path = self.data_dir.join(META_FILE);
        let raw = match fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Unavailable { path, source }),
        };
        match serde_json::from_str::<StoreMeta>(&raw) {
            Ok(meta) => Ok(Some(meta.schema_version)),
            Err(e) => {
                warn!(error = %e, "Unreadable store meta, treating as unversioned");
                Ok(None)
            }
        }
    }

    async fn write_meta(&self) -> Result<(), StoreError> {
        let path = self.data_dir.join(META_FILE);
        let json = serde_json::to_string_pretty(&StoreMeta {
            schema_version: self.schema_version,
        })
        .map_err(|source| StoreError::Encode {
            key: META_FILE.to_string(),
            source,
        })?;
        fs::write(&path, json)
            .await
            .map_err(|source| StoreError::Unavailable { path, source })
    }

    async fn read_documents(&self, collection: Collection) -> Result<Documents, StoreError> {
        let raw = match fs::read_to_string(self.collection_path(collection)).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Documents::new()),
            Err(source) => return Err(StoreError::Read { collection, source }),
        };
        serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt { collection, source })
    }

    /// Write a collection atomically (tmp → rename).
    async fn write_documents(
        &self,
        collection: Collection,
        documents: &Documents,
    ) -> Result<(), StoreError> {
        let path = self.collection_path(collection);
        let tmp_path = path.with_extension("json.tmp");

        let json = serde_json::to_string_pretty(documents).map_err(|source| {
            StoreError::Encode {
                key: collection.name().to_string(),
                source,
            }
        })?;

        fs::write(&tmp_path, json)
            .await
            .map_err(|source| StoreError::Write { collection, source })?;
        fs::rename(&tmp_path, &path)
            .await
            .map_err(|source| StoreError::Write { collection, source })
    }
}

#[async_trait]
impl PersistentStore for JsonFileStore {
    async fn open_collection(&self, collection: Collection) -> Result<(), StoreError> {
        self.ensure_ready().await?;
        debug!(collection = %collection, "Collection open");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_all(&self, collection: Collection) -> Result<Vec<Value>, StoreError> {
        self.ensure_ready().await?;
        let documents = self.read_documents(collection).await?;
        debug!(count = documents.len(), "Loaded documents");
        Ok(documents.into_values().collect())
    }

    #[instrument(skip(self, document))]
    async fn put(
        &self,
        collection: Collection,
        key: &str,
        document: Value,
    ) -> Result<(), StoreError> {
        self.ensure_ready().await?;
        let _guard = self.write_lock.lock().await;

        let mut documents = self.read_documents(collection).await?;
        documents.insert(key.to_string(), document);
        self.write_documents(collection, &documents).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, collection: Collection, key: &str) -> Result<(), StoreError> {
        self.ensure_ready().await?;
        let _guard = self.write_lock.lock().await;

        let mut documents = self.read_documents(collection).await?;
        if documents.remove(key).is_none() {
            debug!("Key not present, nothing to delete");
            return Ok(());
        }
        self.write_documents(collection, &documents).await
    }

    #[instrument(skip(self))]
    async fn clear(&self, collection: Collection) -> Result<(), StoreError> {
        self.ensure_ready().await?;
        let _guard = self.write_lock.lock().await;
        self.write_documents(collection, &Documents::new()).await?;
        info!("Collection cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    fn store(dir: &TempDir) -> JsonFileStore {
        JsonFileStore::new(dir.path().join("db"), 1)
    }

    #[tokio::test]
    async fn test_open_creates_collections_once() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store.open_collection(Collection::Products).await.unwrap();
        store
            .put(Collection::Products, "a", json!({"id": "a"}))
            .await
            .unwrap();
        store.open_collection(Collection::Products).await.unwrap();

        assert!(dir.path().join("db/orders.json").exists());
        assert_eq!(store.get_all(Collection::Products).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_put_replaces_by_key() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store
            .put(Collection::Orders, "1", json!({"id": "1", "name": "old"}))
            .await
            .unwrap();
        store
            .put(Collection::Orders, "1", json!({"id": "1", "name": "new"}))
            .await
            .unwrap();

        let all = store.get_all(Collection::Orders).await.unwrap();
        assert_eq!(all, vec![json!({"id": "1", "name": "new"})]);
    }

    #[tokio::test]
    async fn test_delete_missing_key_is_noop() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store
            .put(Collection::Products, "a", json!({"id": "a"}))
            .await
            .unwrap();
        store.delete(Collection::Products, "zzz").await.unwrap();
        store.delete(Collection::Products, "a").await.unwrap();
        store.delete(Collection::Products, "a").await.unwrap();

        assert!(store.get_all(Collection::Products).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear_only_touches_one_collection() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store
            .put(Collection::Products, "p", json!({"id": "p"}))
            .await
            .unwrap();
        store
            .put(Collection::Orders, "o", json!({"id": "o"}))
            .await
            .unwrap();
        store.clear(Collection::Products).await.unwrap();

        assert!(store.get_all(Collection::Products).await.unwrap().is_empty());
        assert_eq!(store.get_all(Collection::Orders).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_second_instance_sees_writes() {
        let dir = TempDir::new().unwrap();
        store(&dir)
            .put(Collection::Products, "a", json!({"id": "a"}))
            .await
            .unwrap();

        let reopened = store(&dir);
        assert_eq!(reopened.get_all(Collection::Products).await.unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_two_stores_on_one_directory_lose_no_writes() {
        let dir = TempDir::new().unwrap();
        let first = Arc::new(store(&dir));
        let second = Arc::new(store(&dir));

        let mut tasks = Vec::new();
        for i in 0..20 {
            let handle = if i % 2 == 0 {
                Arc::clone(&first)
            } else {
                Arc::clone(&second)
            };
            tasks.push(tokio::spawn(async move {
                let key = i.to_string();
                let document = json!({ "id": i.to_string() });
                handle.put(Collection::Orders, &key, document).await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(first.get_all(Collection::Orders).await.unwrap().len(), 20);
        assert_eq!(second.get_all(Collection::Orders).await.unwrap().len(), 20);
    }

    #[tokio::test]
    async fn test_schema_bump_keeps_data() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db");
        JsonFileStore::new(&path, 1)
            .put(Collection::Products, "a", json!({"id": "a"}))
            .await
            .unwrap();

        let upgraded = JsonFileStore::new(&path, 2);
        assert_eq!(upgraded.get_all(Collection::Products).await.unwrap().len(), 1);

        let meta = std::fs::read_to_string(path.join(META_FILE)).unwrap();
        assert!(meta.contains("\"schema_version\": 2"));
    }

    #[tokio::test]
    async fn test_corrupt_collection_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.open_collection(Collection::Products).await.unwrap();
        std::fs::write(dir.path().join("db/products.json"), "not json").unwrap();

        let err = store.get_all(Collection::Products).await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }
}
