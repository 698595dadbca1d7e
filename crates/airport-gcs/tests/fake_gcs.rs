//! GcsObjectStore against a local fake of the storage upload endpoint
//!
//! The fake records every upload it receives so the tests can check the
//! request the client produced.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};

use airport_core::{ObjectStore, StoreError};
use airport_gcs::{GcsAuth, GcsConfig, GcsObjectStore};

// =============================================================================
// Fake storage server
// =============================================================================

#[derive(Debug, Clone)]
struct Upload {
    bucket: String,
    name: String,
    authorization: Option<String>,
    content_type: Option<String>,
    body: Vec<u8>,
}

#[derive(Clone)]
enum Behavior {
    Accept,
    /// Report a different stored size than was sent
    Truncate,
    Status(StatusCode),
}

#[derive(Clone)]
struct FakeState {
    uploads: Arc<Mutex<Vec<Upload>>>,
    behavior: Behavior,
}

async fn upload(
    State(state): State<FakeState>,
    Path(bucket): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, StatusCode> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let name = query.get("name").cloned().unwrap_or_default();
    state.uploads.lock().push(Upload {
        bucket: bucket.clone(),
        name: name.clone(),
        authorization: header("authorization"),
        content_type: header("content-type"),
        body: body.to_vec(),
    });

    let size = match state.behavior {
        Behavior::Accept => body.len(),
        Behavior::Truncate => body.len() / 2,
        Behavior::Status(status) => return Err(status),
    };

    Ok(Json(json!({
        "bucket": bucket,
        "name": name,
        "size": size.to_string(),
    })))
}

struct FakeGcs {
    addr: SocketAddr,
    uploads: Arc<Mutex<Vec<Upload>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl FakeGcs {
    async fn start(behavior: Behavior) -> Self {
        let uploads = Arc::new(Mutex::new(Vec::new()));
        let state = FakeState {
            uploads: uploads.clone(),
            behavior,
        };
        let router = Router::new()
            .route("/upload/storage/v1/b/{bucket}/o", post(upload))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.ok();
        });

        Self {
            addr,
            uploads,
            _handle: handle,
        }
    }

    fn store(&self, auth: GcsAuth) -> GcsObjectStore {
        GcsObjectStore::new(GcsConfig {
            api_base: format!("http://{}", self.addr),
            public_host: "storage.googleapis.com".to_string(),
            timeout: Duration::from_secs(5),
            auth,
        })
        .expect("Failed to build store")
    }

    fn uploads(&self) -> Vec<Upload> {
        self.uploads.lock().clone()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_upload_with_static_token() {
    let fake = FakeGcs::start(Behavior::Accept).await;
    let store = fake.store(GcsAuth::StaticToken("emulator-token".to_string()));

    let key = "Hazrat Shahjalal International Airport-dac.jpg";
    let url = store
        .write(
            "airportima-bucket",
            key,
            Bytes::from_static(b"\xff\xd8jpeg"),
            Some("image/jpeg"),
        )
        .await
        .unwrap();

    assert_eq!(
        url,
        "https://storage.googleapis.com/airportima-bucket/Hazrat Shahjalal International Airport-dac.jpg"
    );

    let uploads = fake.uploads();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].bucket, "airportima-bucket");
    assert_eq!(uploads[0].name, key);
    assert_eq!(
        uploads[0].authorization.as_deref(),
        Some("Bearer emulator-token")
    );
    assert_eq!(uploads[0].content_type.as_deref(), Some("image/jpeg"));
    assert_eq!(uploads[0].body, b"\xff\xd8jpeg");
}

#[tokio::test]
async fn test_default_content_type() {
    let fake = FakeGcs::start(Behavior::Accept).await;
    let store = fake.store(GcsAuth::StaticToken("t".to_string()));

    store
        .write("b", "k", Bytes::from_static(b"data"), None)
        .await
        .unwrap();

    assert_eq!(
        fake.uploads()[0].content_type.as_deref(),
        Some("application/octet-stream")
    );
}

#[tokio::test]
async fn test_forbidden_is_auth_error() {
    let fake = FakeGcs::start(Behavior::Status(StatusCode::FORBIDDEN)).await;
    let store = fake.store(GcsAuth::StaticToken("t".to_string()));

    let err = store
        .write("b", "k", Bytes::from_static(b"data"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Auth(_)));
}

#[tokio::test]
async fn test_server_error_is_rejected() {
    let fake = FakeGcs::start(Behavior::Status(StatusCode::SERVICE_UNAVAILABLE)).await;
    let store = fake.store(GcsAuth::StaticToken("t".to_string()));

    let err = store
        .write("b", "k", Bytes::from_static(b"data"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Rejected { status: 503, .. }));
    // Single attempt, no retry
    assert_eq!(fake.uploads().len(), 1);
}

#[tokio::test]
async fn test_size_mismatch_is_incomplete() {
    let fake = FakeGcs::start(Behavior::Truncate).await;
    let store = fake.store(GcsAuth::StaticToken("t".to_string()));

    let err = store
        .write("b", "k", Bytes::from_static(b"0123456789"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Incomplete(_)));
}

#[tokio::test]
async fn test_unconfigured_never_contacts_server() {
    let fake = FakeGcs::start(Behavior::Accept).await;
    let store = fake.store(GcsAuth::Unconfigured);

    let err = store
        .write("b", "k", Bytes::from_static(b"data"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Credentials(_)));
    assert!(fake.uploads().is_empty());
}

#[tokio::test]
async fn test_unreachable_endpoint_is_transport_error() {
    // Bind then drop to get a port nobody listens on
    let addr = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let store = GcsObjectStore::new(GcsConfig {
        api_base: format!("http://{}", addr),
        timeout: Duration::from_secs(2),
        auth: GcsAuth::StaticToken("t".to_string()),
        ..Default::default()
    })
    .unwrap();

    let err = store
        .write("b", "k", Bytes::from_static(b"data"), None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Transport(_) | StoreError::Timeout
    ));
}
