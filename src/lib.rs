//! Deployment Tracker: a REST service that records deployment events.
//!
//! The service keeps an in-memory, append-only [`ledger::Ledger`] of
//! deployments and exposes health and metadata endpoints for container
//! orchestrators. Everything is held in an [`state::AppState`] that is built
//! at startup and injected into the Axum router.

pub mod config;
pub mod error;
pub mod http;
pub mod ledger;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod status;

pub use error::AppError;
pub use ledger::{DeploymentRecord, Ledger, NewDeployment};
pub use routes::create_router;
pub use state::AppState;
pub use status::StatusReporter;
