//! HTTP route handlers for the deployment API.
//!
//! Every response carries `Cache-Control: no-store`: health probes and ledger
//! listings must never be served from an intermediate cache.
//!
//! Request tracing is enabled via middleware that generates a unique request ID
//! for each incoming request, allowing correlation of all logs within a request.

pub mod deployments;
pub mod health;
pub mod info;

use axum::http::header::{HeaderValue, CACHE_CONTROL};
use axum::{middleware, routing::get, Router};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::CACHE_CONTROL_API;
use crate::error::AppError;
use crate::middleware::request_id_layer;
use crate::state::AppState;

/// Fallback for unknown paths.
async fn not_found() -> AppError {
    AppError::NotFound
}

/// Creates the Axum router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route(
            "/api/deployments",
            get(deployments::list).post(deployments::create),
        )
        .route("/api/info", get(info::info))
        .route("/", get(info::index));

    // Health check - kept separate so it stays free of API-specific layers
    let health_routes = Router::new().route("/health", get(health::health));

    Router::new()
        .merge(api_routes)
        .merge(health_routes)
        .fallback(not_found)
        .with_state(state)
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_API),
        ))
        .layer(TraceLayer::new_for_http())
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::config::AppConfig;
    use crate::status::StatusReporter;

    fn make_app_state() -> AppState {
        AppState::with_reporter(
            AppConfig::default(),
            StatusReporter::new("test-host", "0.1.0", "development"),
        )
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_endpoint() {
        let app = create_router(make_app_state());

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CACHE_CONTROL], "no-store");
        assert!(response.headers().contains_key("x-request-id"));

        let json = body_json(response).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["hostname"], "test-host");
        assert_eq!(json["version"], "0.1.0");
        assert_eq!(json["environment"], "development");
        assert!(json["timestamp"].is_string());
    }

    #[tokio::test]
    async fn info_endpoint() {
        let app = create_router(make_app_state());

        let response = app
            .oneshot(Request::builder().uri("/api/info").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["app"], "deployment-tracker");
        assert_eq!(json["hostname"], "test-host");
    }

    #[tokio::test]
    async fn index_endpoint() {
        let app = create_router(make_app_state());

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Deployment Tracker API");
        assert_eq!(json["endpoints"]["create_deployment"], "POST /api/deployments");
    }

    #[tokio::test]
    async fn create_without_content_type() {
        let state = make_app_state();
        let app = create_router(state.clone());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/deployments")
                    .body(Body::from(r#"{"service":"billing"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["service"], "billing");
        assert_eq!(state.ledger.len(), 1);
    }

    #[tokio::test]
    async fn create_with_empty_body() {
        let state = make_app_state();
        let app = create_router(state.clone());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/deployments")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Request body must be JSON");
        assert!(state.ledger.is_empty());
    }

    #[tokio::test]
    async fn unknown_path_is_json_404() {
        let app = create_router(make_app_state());

        let response = app
            .oneshot(Request::builder().uri("/api/unknown").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Not found");
    }

    #[tokio::test]
    async fn delete_is_not_allowed() {
        let app = create_router(make_app_state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/deployments")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
