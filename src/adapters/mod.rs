//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies (file I/O, in-memory maps). Each sub-module
//! groups adapters by infrastructure concern.
//!
//! Adapter categories:
//! - `persistence`: JSON file and in-memory stores, flat storage
//! - `media`: Image file to `data:` URL conversion

pub mod media;
pub mod persistence;
