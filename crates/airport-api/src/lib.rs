//! airport-api - HTTP API for the airport catalog
//!
//! Serves the catalog listings and the image upload endpoint on top of a
//! [`CatalogStore`](airport_core::CatalogStore) and any
//! [`ObjectStore`](airport_core::ObjectStore) implementation.
//!
//! # Usage
//!
//! ```ignore
//! use airport_api::{create_router, AppState, UploadSettings};
//! use airport_core::{CatalogStore, MemoryObjectStore};
//!
//! let state = AppState::new(
//!     Arc::new(CatalogStore::with_defaults()),
//!     Arc::new(MemoryObjectStore::default()),
//!     UploadSettings::default(),
//! );
//! let router = create_router(state);
//! ```

pub mod error;
pub mod handlers;
pub mod state;
pub mod testing;

pub use error::ApiError;
pub use state::{AppState, UploadSettings, DEFAULT_BUCKET, DEFAULT_MAX_BODY_BYTES};

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the REST API router with the given application state
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = DefaultBodyLimit::max(state.upload().max_body_bytes);

    Router::new()
        // Health check
        .route("/", get(handlers::health::status))
        // Catalog listings
        .route("/airports", get(handlers::airports::list_airports))
        .route("/airports_v2", get(handlers::airports::list_airports_v2))
        // Image upload
        .route(
            "/update_airport_image",
            post(handlers::upload::update_airport_image),
        )
        // Middleware
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
