//! Shared application state for request handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::ledger::Ledger;
use crate::status::StatusReporter;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// The ledger is owned here rather than living in a global, so every router
/// built from a fresh `AppState` has its own independent set of records.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub ledger: Arc<Ledger>,
    pub reporter: Arc<StatusReporter>,
}

impl AppState {
    /// Creates state with an empty ledger and a reporter for this host.
    pub fn new(config: AppConfig) -> Self {
        let reporter = StatusReporter::from_settings(&config.app);
        Self::with_reporter(config, reporter)
    }

    /// Creates state with an empty ledger and the given reporter.
    pub fn with_reporter(config: AppConfig, reporter: StatusReporter) -> Self {
        Self {
            config: Arc::new(config),
            ledger: Arc::new(Ledger::new()),
            reporter: Arc::new(reporter),
        }
    }
}
