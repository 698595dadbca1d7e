//! Liveness endpoint

/// GET /
pub async fn status() -> &'static str {
    "Status: OK"
}
