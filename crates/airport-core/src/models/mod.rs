//! Catalog data models

pub mod airport;
pub mod seed;

pub use airport::*;
pub use seed::default_airports;
