//! airport-core - Core types and stores for the airport catalog service
//!
//! This crate provides the catalog data model, the in-memory [`CatalogStore`]
//! and the [`ObjectStore`] abstraction that upload handlers write images to.

pub mod catalog;
pub mod error;
pub mod memory;
pub mod models;
pub mod object_store;

pub use catalog::CatalogStore;
pub use error::{StoreError, StoreResult};
pub use memory::{MemoryObjectStore, StoredObject};
pub use models::*;
pub use object_store::{object_url, ObjectStore, DEFAULT_PUBLIC_HOST};
