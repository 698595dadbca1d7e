//! GCS object store client

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;

use airport_core::{object_url, ObjectStore, StoreError, StoreResult, DEFAULT_PUBLIC_HOST};

use crate::credentials::CredentialSource;
use crate::token::ServiceAccountTokenSource;

/// Base URL of the Cloud Storage JSON API
pub const DEFAULT_API_BASE: &str = "https://storage.googleapis.com";

/// How requests to the storage API are authorised
#[derive(Clone, Default)]
pub enum GcsAuth {
    /// Exchange a service-account key for access tokens
    ServiceAccount(CredentialSource),
    /// Fixed bearer token (storage emulators)
    StaticToken(String),
    /// No credentials configured; every write fails with a credential error
    #[default]
    Unconfigured,
}

impl fmt::Debug for GcsAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GcsAuth::ServiceAccount(source) => {
                f.debug_tuple("ServiceAccount").field(source).finish()
            }
            GcsAuth::StaticToken(_) => f.debug_tuple("StaticToken").field(&"<redacted>").finish(),
            GcsAuth::Unconfigured => f.write_str("Unconfigured"),
        }
    }
}

/// Configuration for [`GcsObjectStore`]
#[derive(Debug, Clone)]
pub struct GcsConfig {
    /// API endpoint the upload is sent to
    pub api_base: String,
    /// Host used in the returned public URL
    pub public_host: String,
    /// Per-request timeout (token exchange and upload)
    pub timeout: Duration,
    pub auth: GcsAuth,
}

impl Default for GcsConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            public_host: DEFAULT_PUBLIC_HOST.to_string(),
            timeout: Duration::from_secs(30),
            auth: GcsAuth::Unconfigured,
        }
    }
}

enum Authorizer {
    ServiceAccount(ServiceAccountTokenSource),
    Static(String),
    Unconfigured,
}

/// Subset of the object resource returned by a media upload
#[derive(Deserialize)]
struct ObjectResource {
    #[serde(default)]
    size: Option<String>,
}

/// Object store writing to Google Cloud Storage
pub struct GcsObjectStore {
    http: reqwest::Client,
    api_base: String,
    public_host: String,
    authorizer: Authorizer,
}

impl GcsObjectStore {
    pub fn new(config: GcsConfig) -> StoreResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StoreError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        let authorizer = match config.auth {
            GcsAuth::ServiceAccount(source) => {
                Authorizer::ServiceAccount(ServiceAccountTokenSource::new(source))
            }
            GcsAuth::StaticToken(token) => Authorizer::Static(token),
            GcsAuth::Unconfigured => {
                tracing::warn!("No storage credentials configured; image uploads will fail");
                Authorizer::Unconfigured
            }
        };

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            public_host: config.public_host,
            authorizer,
        })
    }

    async fn bearer_token(&self) -> StoreResult<String> {
        match &self.authorizer {
            Authorizer::ServiceAccount(source) => source.token(&self.http).await,
            Authorizer::Static(token) => Ok(token.clone()),
            Authorizer::Unconfigured => Err(StoreError::Credentials(
                "No service-account credentials configured".to_string(),
            )),
        }
    }
}

fn transport_error(e: reqwest::Error) -> StoreError {
    if e.is_timeout() {
        StoreError::Timeout
    } else {
        StoreError::Transport(e.to_string())
    }
}

#[async_trait]
impl ObjectStore for GcsObjectStore {
    fn kind(&self) -> &'static str {
        "gcs"
    }

    async fn write(
        &self,
        bucket: &str,
        object_key: &str,
        content: Bytes,
        content_type: Option<&str>,
    ) -> StoreResult<String> {
        let token = self.bearer_token().await?;
        let size = content.len();

        let response = self
            .http
            .post(format!("{}/upload/storage/v1/b/{}/o", self.api_base, bucket))
            .query(&[("uploadType", "media"), ("name", object_key)])
            .header(
                CONTENT_TYPE,
                content_type.unwrap_or("application/octet-stream"),
            )
            .bearer_auth(token)
            .body(content)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(StoreError::Auth(format!("Storage API returned {}", status)));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                message: message.chars().take(256).collect(),
            });
        }

        let resource: ObjectResource = response
            .json()
            .await
            .map_err(|e| StoreError::Incomplete(format!("Unreadable upload response: {}", e)))?;
        if let Some(stored) = resource.size {
            if stored.parse::<usize>().ok() != Some(size) {
                return Err(StoreError::Incomplete(format!(
                    "Stored {} bytes, sent {}",
                    stored, size
                )));
            }
        }

        tracing::info!(bucket, object_key, size, "Object uploaded to GCS");

        Ok(object_url(&self.public_host, bucket, object_key))
    }
}
