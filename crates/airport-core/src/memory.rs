//! In-process object store for local runs and tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::error::StoreResult;
use crate::object_store::{object_url, ObjectStore, DEFAULT_PUBLIC_HOST};

/// An object held by [`MemoryObjectStore`]
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub content: Bytes,
    pub content_type: Option<String>,
    pub written_at: DateTime<Utc>,
}

/// Object store keeping everything in memory, keyed by (bucket, key)
#[derive(Debug)]
pub struct MemoryObjectStore {
    public_host: String,
    objects: RwLock<HashMap<(String, String), StoredObject>>,
    writes: AtomicUsize,
}

impl MemoryObjectStore {
    pub fn new(public_host: impl Into<String>) -> Self {
        Self {
            public_host: public_host.into(),
            objects: RwLock::new(HashMap::new()),
            writes: AtomicUsize::new(0),
        }
    }

    /// Get a stored object
    pub fn get(&self, bucket: &str, object_key: &str) -> Option<StoredObject> {
        self.objects
            .read()
            .get(&(bucket.to_string(), object_key.to_string()))
            .cloned()
    }

    /// Number of objects currently stored
    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }

    /// Number of write calls received (including overwrites)
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl Default for MemoryObjectStore {
    fn default() -> Self {
        Self::new(DEFAULT_PUBLIC_HOST)
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    fn kind(&self) -> &'static str {
        "memory"
    }

    async fn write(
        &self,
        bucket: &str,
        object_key: &str,
        content: Bytes,
        content_type: Option<&str>,
    ) -> StoreResult<String> {
        self.writes.fetch_add(1, Ordering::SeqCst);

        let size = content.len();
        self.objects.write().insert(
            (bucket.to_string(), object_key.to_string()),
            StoredObject {
                content,
                content_type: content_type.map(str::to_string),
                written_at: Utc::now(),
            },
        );

        tracing::debug!(bucket, object_key, size, "Object stored in memory");

        Ok(object_url(&self.public_host, bucket, object_key))
    }
}
