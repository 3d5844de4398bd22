//! Legacy Migration - Flat Slots into the Persistent Store
//!
//! Older versions kept each collection as one JSON array in a flat
//! storage slot named after the collection. On every startup the slot is
//! checked and, if present, its entries are copied into the store and the
//! slot removed.
//!
//! Never fails: parse errors and per-entry write failures are logged and
//! startup carries on. The slot is removed once it has parsed, even if
//! some writes failed; an unparseable slot is left untouched.

use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info, instrument, warn};

use crate::ports::flat_storage::FlatStorage;
use crate::ports::store::{Collection, PersistentStore};

/// Outcome of one migration pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// A legacy slot existed for the collection.
    pub found: bool,
    /// Entries written to the store.
    pub migrated: usize,
    /// Entries that could not be written.
    pub failed: usize,
    /// The legacy slot was removed.
    pub slot_removed: bool,
}

/// Moves legacy flat-storage data into the persistent store.
pub struct LegacyMigrator {
    store: Arc<dyn PersistentStore>,
    legacy: Arc<dyn FlatStorage>,
}

impl LegacyMigrator {
    pub fn new(store: Arc<dyn PersistentStore>, legacy: Arc<dyn FlatStorage>) -> Self {
        Self { store, legacy }
    }

    /// Migrate the legacy slot for `collection`, if any.
    ///
    /// Idempotent: once the slot is gone, later calls find nothing.
    #[instrument(skip(self), fields(collection = %collection))]
    pub async fn migrate(&self, collection: Collection) -> MigrationReport {
        let mut report = MigrationReport::default();

        let raw = match self.legacy.get_item(collection.name()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return report,
            Err(e) => {
                error!(error = %e, "Failed to read legacy slot");
                return report;
            }
        };
        report.found = true;

        let entries: Vec<Value> = match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                error!(error = %e, "Legacy slot is not a JSON array, leaving it in place");
                return report;
            }
        };

        for mut entry in entries {
            let Some(key) = entry_key(&entry) else {
                warn!("Legacy entry has no id, skipping");
                report.failed += 1;
                continue;
            };
            if let Some(fields) = entry.as_object_mut() {
                fields.insert("id".to_string(), Value::String(key.clone()));
            }
            match self.store.put(collection, &key, entry).await {
                Ok(()) => report.migrated += 1,
                Err(e) => {
                    warn!(id = %key, error = %e, "Failed to migrate legacy entry");
                    report.failed += 1;
                }
            }
        }

        match self.legacy.remove_item(collection.name()) {
            Ok(()) => report.slot_removed = true,
            Err(e) => error!(error = %e, "Failed to remove legacy slot"),
        }

        info!(
            migrated = report.migrated,
            failed = report.failed,
            "Legacy migration finished"
        );
        report
    }
}

/// The `id` of a legacy entry. Numeric ids are accepted and stored as strings.
fn entry_key(entry: &Value) -> Option<String> {
    match entry.get("id")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}
