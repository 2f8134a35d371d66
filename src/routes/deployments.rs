//! Handlers for recording and listing deployments.
//!
//! The create handler reads the raw body instead of using the `Json` extractor:
//! a missing Content-Type is accepted, and every parse failure maps to the same
//! fixed 400 response.

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use serde_json::Value;
use tracing::instrument;

use crate::error::AppError;
use crate::ledger::{DeploymentRecord, NewDeployment};
use crate::state::AppState;
use crate::status::DeploymentList;

/// List every recorded deployment in creation order.
#[instrument(name = "deployments::list", skip(state))]
pub async fn list(State(state): State<AppState>) -> Json<DeploymentList> {
    let list = state.reporter.list_deployments(&state.ledger);
    tracing::debug!(count = list.count, "Listed deployments");
    Json(list)
}

/// Record a new deployment.
///
/// Example request body:
///
/// ```json
/// {"service": "web-frontend", "version": "2.1.0", "environment": "production", "deployed_by": "github-actions"}
/// ```
#[instrument(name = "deployments::create", skip(state, body), fields(body_len = body.len()))]
pub async fn create(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<DeploymentRecord>), AppError> {
    let input = parse_body(&body)?;
    let record = state.ledger.append(input);

    tracing::info!(
        id = record.id,
        service = %record.service,
        version = %record.version,
        environment = %record.environment,
        deployed_by = %record.deployed_by,
        "Deployment recorded"
    );

    Ok((StatusCode::CREATED, Json(record)))
}

/// Parse a create request body. It must be a JSON object; any other JSON value,
/// invalid JSON, or an empty body is rejected.
pub fn parse_body(body: &[u8]) -> Result<NewDeployment, AppError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(value @ Value::Object(_)) => {
            serde_json::from_value(value).map_err(|_| AppError::InvalidBody)
        }
        Ok(_) | Err(_) => Err(AppError::InvalidBody),
    }
}
