//! Flat Storage Adapters - Device-local String Slots
//!
//! `JsonFlatStorage` keeps every slot in a single JSON object file
//! (`local_storage.json`). `MemoryFlatStorage` is the volatile variant.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::debug;

use crate::ports::flat_storage::{FlatStorage, FlatStorageError};

type Slots = HashMap<String, String>;

/// Flat storage persisted as one JSON object file.
///
/// Writes are atomic (tmp → rename). Each call re-reads the file so
/// several handles on the same path stay consistent.
pub struct JsonFlatStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFlatStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn load(&self) -> Result<Slots, FlatStorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Slots::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, slots: &Slots) -> Result<(), FlatStorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, serde_json::to_string_pretty(slots)?)?;
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn modify(&self, f: impl FnOnce(&mut Slots) -> bool) -> Result<(), FlatStorageError> {
        let _guard = self.lock.lock().map_err(|_| FlatStorageError::Poisoned)?;
        let mut slots = self.load()?;
        if f(&mut slots) {
            self.save(&slots)?;
        }
        Ok(())
    }
}

impl FlatStorage for JsonFlatStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, FlatStorageError> {
        let _guard = self.lock.lock().map_err(|_| FlatStorageError::Poisoned)?;
        Ok(self.load()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), FlatStorageError> {
        debug!(key, "Setting flat storage slot");
        self.modify(|slots| {
            slots.insert(key.to_string(), value.to_string());
            true
        })
    }

    fn remove_item(&self, key: &str) -> Result<(), FlatStorageError> {
        debug!(key, "Removing flat storage slot");
        self.modify(|slots| slots.remove(key).is_some())
    }
}

/// Volatile flat storage.
#[derive(Debug, Default)]
pub struct MemoryFlatStorage {
    slots: Mutex<Slots>,
}

impl MemoryFlatStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FlatStorage for MemoryFlatStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, FlatStorageError> {
        let slots = self.slots.lock().map_err(|_| FlatStorageError::Poisoned)?;
        Ok(slots.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), FlatStorageError> {
        self.slots
            .lock()
            .map_err(|_| FlatStorageError::Poisoned)?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), FlatStorageError> {
        self.slots
            .lock()
            .map_err(|_| FlatStorageError::Poisoned)?
            .remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_json_slots_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("local_storage.json");

        JsonFlatStorage::new(&path).set_item("isAdmin", "true").unwrap();

        let reopened = JsonFlatStorage::new(&path);
        assert_eq!(reopened.get_item("isAdmin").unwrap().as_deref(), Some("true"));

        reopened.remove_item("isAdmin").unwrap();
        assert_eq!(JsonFlatStorage::new(&path).get_item("isAdmin").unwrap(), None);
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let storage = JsonFlatStorage::new(dir.path().join("absent.json"));
        assert_eq!(storage.get_item("products").unwrap(), None);
        storage.remove_item("products").unwrap();
        assert!(!dir.path().join("absent.json").exists());
    }

    #[test]
    fn test_memory_slots() {
        let storage = MemoryFlatStorage::new();
        storage.set_item("k", "v").unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("v"));
        storage.remove_item("k").unwrap();
        assert_eq!(storage.get_item("k").unwrap(), None);
    }
}
