//! Application state for the airport API

use std::sync::Arc;

use airport_core::{CatalogStore, ObjectStore};

/// Bucket images are written to unless configured otherwise
pub const DEFAULT_BUCKET: &str = "airportima-bucket";

/// Hard cap on an upload request body (10 MiB)
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 << 20;

/// Upload endpoint settings
#[derive(Debug, Clone)]
pub struct UploadSettings {
    /// Destination bucket for uploaded images
    pub bucket: String,
    /// Maximum accepted request body size in bytes
    pub max_body_bytes: usize,
    /// Check that the airport exists before writing the image, so an unknown
    /// name never leaves an unreferenced object behind
    pub precheck_name: bool,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_BUCKET.to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            precheck_name: true,
        }
    }
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    catalog: Arc<CatalogStore>,
    object_store: Arc<dyn ObjectStore>,
    upload: Arc<UploadSettings>,
}

impl AppState {
    pub fn new(
        catalog: Arc<CatalogStore>,
        object_store: Arc<dyn ObjectStore>,
        upload: UploadSettings,
    ) -> Self {
        Self {
            catalog,
            object_store,
            upload: Arc::new(upload),
        }
    }

    /// Get the catalog store
    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    /// Get the object store images are written to
    pub fn object_store(&self) -> &dyn ObjectStore {
        self.object_store.as_ref()
    }

    pub fn upload(&self) -> &UploadSettings {
        &self.upload
    }
}
