//! Application metadata and the endpoint directory.

use axum::{extract::State, Json};
use tracing::instrument;

use crate::state::AppState;
use crate::status::{AppInfo, EndpointDirectory};

/// Reports which version is running where.
#[instrument(name = "info::info", skip(state))]
pub async fn info(State(state): State<AppState>) -> Json<AppInfo> {
    Json(state.reporter.info())
}

/// Landing page listing the available endpoints.
#[instrument(name = "info::index", skip(state))]
pub async fn index(State(state): State<AppState>) -> Json<EndpointDirectory> {
    Json(state.reporter.index())
}
