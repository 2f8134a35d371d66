//! Health check endpoint for container orchestration.
//!
//! Serves both the liveness and readiness probes. It only checks that the
//! process can respond to HTTP, so it never touches the ledger.

use axum::{extract::State, Json};

use crate::state::AppState;
use crate::status::HealthStatus;

/// Health check handler.
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(state.reporter.health())
}
