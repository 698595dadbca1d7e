//! ObjectStore trait - the boundary to external blob storage

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StoreResult;

/// Host serving public object URLs for Google Cloud Storage
pub const DEFAULT_PUBLIC_HOST: &str = "storage.googleapis.com";

/// Build the public URL of an object: `https://<host>/<bucket>/<key>`
///
/// `host` may carry its own `http://` or `https://` scheme (plain-http storage
/// emulators). The key is inserted verbatim, without percent-encoding.
pub fn object_url(host: &str, bucket: &str, object_key: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        format!("{}/{}/{}", host, bucket, object_key)
    } else {
        format!("https://{}/{}/{}", host, bucket, object_key)
    }
}

/// A blob store that accepts named objects and exposes them at a public URL
///
/// Implementations perform exactly one write attempt per call. Success means
/// the whole content was accepted and is retrievable at the returned URL.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Short backend identifier for logs (e.g. "gcs", "memory")
    fn kind(&self) -> &'static str;

    /// Write `content` to `bucket/object_key`, returning its public URL
    async fn write(
        &self,
        bucket: &str,
        object_key: &str,
        content: Bytes,
        content_type: Option<&str>,
    ) -> StoreResult<String>;
}
