//! Flat Storage Port - Device-local String Slots
//!
//! A synchronous string key-value area scoped to one device. It holds the
//! admin flag and the legacy per-collection slots that predate the
//! persistent store.

use thiserror::Error;

/// Flat storage failure.
#[derive(Debug, Error)]
pub enum FlatStorageError {
    #[error("flat storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("flat storage file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("flat storage lock poisoned")]
    Poisoned,
}

/// Trait for device-local string slots.
pub trait FlatStorage: Send + Sync + 'static {
    /// Value stored under `key`, if any.
    fn get_item(&self, key: &str) -> Result<Option<String>, FlatStorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), FlatStorageError>;

    /// Remove `key`. Absent keys are a no-op.
    fn remove_item(&self, key: &str) -> Result<(), FlatStorageError>;
}
