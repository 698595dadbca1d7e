//! OAuth2 access tokens for the storage API
//!
//! Service-account keys are exchanged for short-lived access tokens using the
//! JWT bearer grant. The key is loaded once on first use; the token is cached
//! and refreshed shortly before it expires.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, OnceCell};

use airport_core::{StoreError, StoreResult};

use crate::credentials::{CredentialSource, ServiceAccountKey};

/// OAuth2 scope for read/write access to Cloud Storage
pub const STORAGE_SCOPE: &str = "https://www.googleapis.com/auth/devstorage.read_write";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime requested for the signed assertion
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Tokens are refreshed this long before their stated expiry
const REFRESH_MARGIN_SECS: i64 = 60;

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

/// Produces access tokens from a service-account key
pub struct ServiceAccountTokenSource {
    source: CredentialSource,
    key: OnceCell<ServiceAccountKey>,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountTokenSource {
    pub fn new(source: CredentialSource) -> Self {
        Self {
            source,
            key: OnceCell::new(),
            cached: Mutex::new(None),
        }
    }

    /// Load the key on first call; later calls reuse it
    ///
    /// A failed load is not cached, so the next request tries again.
    async fn key(&self) -> StoreResult<&ServiceAccountKey> {
        self.key
            .get_or_try_init(|| async {
                let key = self
                    .source
                    .load()
                    .await
                    .map_err(|e| StoreError::Credentials(e.to_string()))?;
                tracing::info!(
                    client_email = %key.client_email,
                    "Loaded service-account credentials"
                );
                Ok::<_, StoreError>(key)
            })
            .await
    }

    /// Return a valid access token, exchanging the key if needed
    pub async fn token(&self, http: &reqwest::Client) -> StoreResult<String> {
        let key = self.key().await?;

        let mut cached = self.cached.lock().await;
        let now = Utc::now();
        if let Some(token) = cached.as_ref() {
            if token.expires_at - Duration::seconds(REFRESH_MARGIN_SECS) > now {
                return Ok(token.value.clone());
            }
        }

        let fresh = exchange(http, key, now).await?;
        let value = fresh.value.clone();
        *cached = Some(fresh);
        Ok(value)
    }
}

/// Sign an assertion for `key` and trade it for an access token
async fn exchange(
    http: &reqwest::Client,
    key: &ServiceAccountKey,
    now: DateTime<Utc>,
) -> StoreResult<CachedToken> {
    let iat = now.timestamp();
    let claims = Claims {
        iss: &key.client_email,
        scope: STORAGE_SCOPE,
        aud: &key.token_uri,
        iat,
        exp: iat + ASSERTION_LIFETIME_SECS,
    };

    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(key.private_key_id.clone());

    let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .map_err(|e| StoreError::Credentials(format!("Invalid private key: {}", e)))?;
    let assertion = encode(&header, &claims, &signing_key)
        .map_err(|e| StoreError::Credentials(format!("Failed to sign assertion: {}", e)))?;

    let response = http
        .post(&key.token_uri)
        .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                StoreError::Timeout
            } else {
                StoreError::Transport(format!("Token request failed: {}", e))
            }
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(StoreError::Auth(format!(
            "Token endpoint returned {}",
            status
        )));
    }

    let body: TokenResponse = response
        .json()
        .await
        .map_err(|e| StoreError::Auth(format!("Malformed token response: {}", e)))?;

    let lifetime = body.expires_in.unwrap_or(ASSERTION_LIFETIME_SECS);
    tracing::debug!(expires_in = lifetime, "Obtained storage access token");

    Ok(CachedToken {
        value: body.access_token,
        expires_at: now + Duration::seconds(lifetime),
    })
}
