//! HTTP/HTTPS server startup logic.

use std::net::SocketAddr;

use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use axum_server::Handle;

use crate::config::{HttpServerConfig, TlsMode};

use super::shutdown;

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    #[error("Failed to load TLS configuration: {0}")]
    TlsConfig(String),

    #[error("Server error: {0}")]
    Server(String),
}

/// Parse the configured host and port into a socket address.
pub fn bind_addr(config: &HttpServerConfig) -> Result<SocketAddr, ServerError> {
    format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| ServerError::Server(format!("Invalid http.host or http.port: {}", e)))
}

/// Start the HTTP/HTTPS server based on configuration.
///
/// This function blocks until the server shuts down.
pub async fn start_server(app: Router, config: &HttpServerConfig) -> Result<(), ServerError> {
    let addr = bind_addr(config)?;
    let handle = Handle::new();

    match (&config.tls.mode, &config.tls.cert_path, &config.tls.key_path) {
        (TlsMode::None, _, _) => start_plain_server(app, addr, handle).await,
        (TlsMode::Manual, Some(cert_path), Some(key_path)) => {
            start_manual_tls_server(app, addr, cert_path, key_path, handle).await
        }
        (TlsMode::Manual, _, _) => Err(ServerError::TlsConfig(
            "manual TLS requires cert_path and key_path".to_string(),
        )),
    }
}

/// Start a plain HTTP server (no TLS).
async fn start_plain_server(
    app: Router,
    addr: SocketAddr,
    handle: Handle,
) -> Result<(), ServerError> {
    tracing::info!(%addr, "Starting HTTP server (no TLS)");

    shutdown::setup_shutdown_handler(handle.clone());

    axum_server::bind(addr)
        .handle(handle)
        .serve(app.into_make_service())
        .await
        .map_err(ServerError::Bind)
}

/// Start HTTPS server with user-provided certificates.
async fn start_manual_tls_server(
    app: Router,
    addr: SocketAddr,
    cert_path: &str,
    key_path: &str,
    handle: Handle,
) -> Result<(), ServerError> {
    tracing::info!(%addr, cert = %cert_path, key = %key_path, "Starting HTTPS server (manual certs)");

    // Ignore the error: a provider may already be installed by the runtime
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let rustls_config = RustlsConfig::from_pem_file(cert_path, key_path)
        .await
        .map_err(|e| ServerError::TlsConfig(format!("Failed to load certificates: {}", e)))?;

    shutdown::setup_shutdown_handler(handle.clone());
    shutdown::setup_reload_handler(
        rustls_config.clone(),
        cert_path.to_string(),
        key_path.to_string(),
    );

    axum_server::bind_rustls(addr, rustls_config)
        .handle(handle)
        .serve(app.into_make_service())
        .await
        .map_err(ServerError::Bind)
}
