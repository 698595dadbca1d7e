//! airport-gcs - Google Cloud Storage backend
//!
//! Implements [`airport_core::ObjectStore`] on top of the GCS JSON API media
//! upload. Requests are authorised with an OAuth2 access token obtained from a
//! service-account key (JWT bearer grant), or with a fixed token when talking
//! to a storage emulator.
//!
//! # Usage
//!
//! ```ignore
//! use airport_gcs::{CredentialSource, GcsAuth, GcsConfig, GcsObjectStore};
//!
//! let config = GcsConfig {
//!     auth: GcsAuth::ServiceAccount(CredentialSource::File("sa.json".into())),
//!     ..Default::default()
//! };
//! let store = GcsObjectStore::new(config)?;
//! let url = store.write("airportima-bucket", "key.jpg", bytes, None).await?;
//! ```

pub mod client;
pub mod credentials;
pub mod token;

pub use client::{GcsAuth, GcsConfig, GcsObjectStore, DEFAULT_API_BASE};
pub use credentials::{CredentialSource, CredentialsError, ServiceAccountKey};
