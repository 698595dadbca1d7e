//! Catalog listing handlers

use axum::extract::State;
use axum::Json;

use airport_core::{AirportRecord, AirportRecordExtended};

use crate::state::AppState;

/// GET /airports
/// List all airports
pub async fn list_airports(State(state): State<AppState>) -> Json<Vec<AirportRecord>> {
    Json(state.catalog().list_base())
}

/// GET /airports_v2
/// List all airports with runway lengths
pub async fn list_airports_v2(State(state): State<AppState>) -> Json<Vec<AirportRecordExtended>> {
    Json(state.catalog().list_extended())
}
