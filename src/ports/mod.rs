//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the usecases layer requires
//! from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `PersistentStore`: Durable keyed document collections
//! - `FlatStorage`: Device-local string slots (admin flag, legacy data)
//! - `LinkLauncher`: Outbound messaging deep link handoff
//! - `Confirm`: Interactive yes/no gate

pub mod flat_storage;
pub mod messaging;
pub mod prompt;
pub mod store;
