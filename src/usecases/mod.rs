//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with port interfaces to implement the
//! storefront's workflows. Each use case is a self-contained operation.
//!
//! Use cases:
//! - `LegacyMigrator`: One-time move of flat-storage data into the store
//! - `CatalogRepository`: Product list/upsert/delete with seeding and repair
//! - `OrderRepository`: Order list (newest first)/upsert/delete
//! - `AdminSession`: Password-gated management mode flag
//! - `ViewState`: Filter, selection and edit target
//! - `OrderIntake`: Validate, record and hand off an order
//! - `Storefront`: Session controller tying the above together

pub mod admin;
pub mod catalog;
pub mod intake;
pub mod migration;
pub mod orders;
pub mod storefront;
pub mod view;
