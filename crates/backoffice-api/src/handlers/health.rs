//! Liveness check for the back-office API.
//!
//! Reports a fixed `ok` status with the crate version and seconds since the
//! server configuration was created. Database and pipeline state are not
//! inspected.

use axum::{extract::State, Json};

use crate::state::AppState;
use crate::types::HealthResponse;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.config.uptime_seconds(),
    })
}
