//! Request-level errors and their JSON responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Message returned when a create request has no usable JSON object body
pub const INVALID_BODY_MESSAGE: &str = "Request body must be JSON";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Request body must be JSON")]
    InvalidBody,

    #[error("Not found")]
    NotFound,
}

/// JSON error body: `{"error": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl AppError {
    pub const fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidBody => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::debug!(status = status.as_u16(), error = %self, "Request rejected");

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
