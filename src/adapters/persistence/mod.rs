//! Persistence Adapters - JSON File and In-memory Storage
//!
//! Implements the `PersistentStore` port with per-collection JSON files
//! (atomic tmp → rename writes) and an in-memory map, plus the flat
//! storage used for the admin flag and legacy slots.

pub mod flat;
pub mod json_store;
pub mod memory;

pub use flat::{JsonFlatStorage, MemoryFlatStorage};
pub use json_store::JsonFileStore;
pub use memory::MemoryStore;
