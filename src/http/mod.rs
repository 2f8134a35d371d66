//! HTTP server module with optional TLS.
//!
//! Two listener modes:
//! - **None (default)**: Plain HTTP, for pods behind an ingress that terminates TLS
//! - **Manual**: User-provided certificate and key files
//!
//! The server includes:
//! - Graceful shutdown on SIGTERM/SIGINT, so pod termination drains in-flight requests
//! - Certificate hot-reload via SIGHUP (manual mode)

mod server;
mod shutdown;

pub use server::{start_server, ServerError};
