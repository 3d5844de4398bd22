//! Domain layer - Catalog and order intake models.
//!
//! Pure types and functions: no I/O, no storage, no clock reads.
//! Callers pass `now` in wherever a timestamp is needed.

pub mod filter;
pub mod ids;
mod lenient;
pub mod message;
pub mod order;
pub mod product;
pub mod seed;

// Re-export core types for convenience
pub use filter::{CategoryFilter, apply_filter};
pub use message::MessageTemplate;
pub use order::{IntakeError, Order, OrderDraft, OrderId};
pub use product::{Product, ProductDraft, ProductFormError, ProductId, REQUIRED_PRODUCT_ID};
