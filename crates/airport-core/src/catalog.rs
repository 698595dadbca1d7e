//! In-memory airport catalog
//!
//! The catalog holds a single collection of [`AirportRecordExtended`] entries.
//! The base listing is a projection of that collection, so an image URL patch
//! is visible through both listings.

use parking_lot::RwLock;

use crate::models::{default_airports, AirportRecord, AirportRecordExtended};

/// Shared, process-lifetime store of airport records
///
/// Reads take a shared lock and clone a snapshot. The only mutation,
/// [`CatalogStore::update_image_url`], takes the write lock for the duration of
/// the scan-and-patch.
#[derive(Debug)]
pub struct CatalogStore {
    records: RwLock<Vec<AirportRecordExtended>>,
}

impl CatalogStore {
    /// Create a catalog from seed records, preserving their order
    pub fn new(records: Vec<AirportRecordExtended>) -> Self {
        let mut seen = std::collections::HashSet::new();
        for record in &records {
            if !seen.insert(record.name()) {
                tracing::warn!(
                    name = %record.name(),
                    "Duplicate airport name in catalog; updates will only reach the first entry"
                );
            }
        }

        Self {
            records: RwLock::new(records),
        }
    }

    /// Create a catalog holding the built-in seed airports
    pub fn with_defaults() -> Self {
        Self::new(default_airports())
    }

    /// Snapshot of the base records, in insertion order
    pub fn list_base(&self) -> Vec<AirportRecord> {
        self.records
            .read()
            .iter()
            .map(|r| r.airport.clone())
            .collect()
    }

    /// Snapshot of the extended records, in insertion order
    pub fn list_extended(&self) -> Vec<AirportRecordExtended> {
        self.records.read().clone()
    }

    /// Whether a record with exactly this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.records.read().iter().any(|r| r.name() == name)
    }

    /// Set the image URL of the first record whose name equals `name`
    ///
    /// Matching is exact and case-sensitive. Returns `false` without touching
    /// the catalog when nothing matches.
    pub fn update_image_url(&self, name: &str, url: &str) -> bool {
        let mut records = self.records.write();
        match records.iter_mut().find(|r| r.name() == name) {
            Some(record) => {
                record.airport.image_url = url.to_string();
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::with_defaults()
    }
}
