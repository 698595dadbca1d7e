//! TOML configuration for the daemon
//!
//! Every section is optional; an empty file (or no file) gives the defaults:
//! port 8080, 10 MiB upload cap, GCS backend writing to `airportima-bucket`,
//! built-in seed catalog.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use airport_api::{UploadSettings, DEFAULT_BUCKET, DEFAULT_MAX_BODY_BYTES};
use airport_core::{default_airports, AirportRecordExtended, DEFAULT_PUBLIC_HOST};
use airport_gcs::{CredentialSource, GcsAuth, GcsConfig, DEFAULT_API_BASE};

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Upload endpoint settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub max_body_bytes: usize,
    /// Reject unknown airport names before writing to storage
    pub precheck_name: bool,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            precheck_name: true,
        }
    }
}

/// Which object store backs image uploads
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Gcs,
    Memory,
}

/// `[storage.gcs]` section
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct GcsSection {
    /// Service-account JSON key file
    pub credentials_file: Option<PathBuf>,
    pub api_base: String,
    /// Fixed bearer token for storage emulators
    pub static_token: Option<String>,
}

impl Default for GcsSection {
    fn default() -> Self {
        Self {
            credentials_file: None,
            api_base: DEFAULT_API_BASE.to_string(),
            static_token: None,
        }
    }
}

impl fmt::Debug for GcsSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GcsSection")
            .field("credentials_file", &self.credentials_file)
            .field("api_base", &self.api_base)
            .field(
                "static_token",
                &self.static_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Object storage settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub bucket: String,
    /// Host in the public URL returned for uploaded images
    pub public_host: String,
    pub timeout_secs: u64,
    pub gcs: GcsSection,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Gcs,
            bucket: DEFAULT_BUCKET.to_string(),
            public_host: DEFAULT_PUBLIC_HOST.to_string(),
            timeout_secs: 30,
            gcs: GcsSection::default(),
        }
    }
}

impl StorageConfig {
    /// Build the GCS client configuration
    ///
    /// Auth resolution: `static_token`, then `credentials_file`, then the
    /// `AIRPORTD_GCS_CREDENTIALS_BASE64` / `GOOGLE_APPLICATION_CREDENTIALS`
    /// environment variables.
    pub fn gcs_config(&self) -> GcsConfig {
        let auth = if let Some(token) = &self.gcs.static_token {
            GcsAuth::StaticToken(token.clone())
        } else if let Some(path) = &self.gcs.credentials_file {
            GcsAuth::ServiceAccount(CredentialSource::File(path.clone()))
        } else if let Some(source) = CredentialSource::from_env() {
            GcsAuth::ServiceAccount(source)
        } else {
            GcsAuth::Unconfigured
        };

        GcsConfig {
            api_base: self.gcs.api_base.clone(),
            public_host: self.public_host.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            auth,
        }
    }
}

/// Seed catalog
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Airports to serve; empty means the built-in seed
    pub airports: Vec<AirportRecordExtended>,
}

/// Top-level daemon configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    pub server: ServerConfig,
    pub upload: UploadConfig,
    pub storage: StorageConfig,
    pub catalog: CatalogConfig,
}

impl DaemonConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;
        Self::from_toml(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn upload_settings(&self) -> UploadSettings {
        UploadSettings {
            bucket: self.storage.bucket.clone(),
            max_body_bytes: self.upload.max_body_bytes,
            precheck_name: self.upload.precheck_name,
        }
    }

    /// Records the catalog starts with
    pub fn seed(&self) -> Vec<AirportRecordExtended> {
        if self.catalog.airports.is_empty() {
            default_airports()
        } else {
            self.catalog.airports.clone()
        }
    }
}
