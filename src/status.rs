//! Liveness, readiness and metadata reporting.
//!
//! The reporter holds only facts fixed at startup (hostname, version,
//! environment). Health checks never consult the ledger or any external
//! resource: orchestrators poll them on tight timeouts, and a process that can
//! answer HTTP is considered healthy.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::{AppSettings, APP_NAME, INDEX_MESSAGE};
use crate::ledger::{DeploymentRecord, Ledger};

/// Hostname reported when no better identity can be resolved
pub const FALLBACK_HOSTNAME: &str = "localhost";

/// Health status value; there is no unhealthy branch
pub const STATUS_HEALTHY: &str = "healthy";

/// Response body for `GET /health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub hostname: String,
    pub version: String,
    pub environment: String,
    pub timestamp: DateTime<Utc>,
}

/// Response body for `GET /api/info`
#[derive(Debug, Clone, Serialize)]
pub struct AppInfo {
    pub app: &'static str,
    pub version: String,
    pub environment: String,
    pub hostname: String,
}

/// Response body for `GET /api/deployments`
#[derive(Debug, Clone, Serialize)]
pub struct DeploymentList {
    pub count: usize,
    pub deployments: Vec<DeploymentRecord>,
}

/// Response body for `GET /`
#[derive(Debug, Clone, Serialize)]
pub struct EndpointDirectory {
    pub message: &'static str,
    pub endpoints: BTreeMap<&'static str, &'static str>,
}

/// Answers health and metadata queries from process-wide read-only facts.
#[derive(Debug, Clone)]
pub struct StatusReporter {
    hostname: String,
    version: String,
    environment: String,
}

impl StatusReporter {
    pub fn new(
        hostname: impl Into<String>,
        version: impl Into<String>,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            version: version.into(),
            environment: environment.into(),
        }
    }

    /// Build a reporter for this host using the configured version and environment.
    pub fn from_settings(settings: &AppSettings) -> Self {
        Self::new(
            resolve_hostname(),
            settings.version.clone(),
            settings.environment.clone(),
        )
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            status: STATUS_HEALTHY,
            hostname: self.hostname.clone(),
            version: self.version.clone(),
            environment: self.environment.clone(),
            timestamp: Utc::now(),
        }
    }

    pub fn info(&self) -> AppInfo {
        AppInfo {
            app: APP_NAME,
            version: self.version.clone(),
            environment: self.environment.clone(),
            hostname: self.hostname.clone(),
        }
    }

    /// Count and records come from the same snapshot, so they always agree.
    pub fn list_deployments(&self, ledger: &Ledger) -> DeploymentList {
        let deployments = ledger.snapshot();
        DeploymentList {
            count: deployments.len(),
            deployments,
        }
    }

    pub fn index(&self) -> EndpointDirectory {
        EndpointDirectory {
            message: INDEX_MESSAGE,
            endpoints: BTreeMap::from([
                ("health", "/health"),
                ("list_deployments", "GET /api/deployments"),
                ("create_deployment", "POST /api/deployments"),
                ("app_info", "/api/info"),
            ]),
        }
    }
}

/// Resolve the host identity: `HOSTNAME`, then `/etc/hostname`, then a fallback.
///
/// Inside a Kubernetes pod `HOSTNAME` is the pod name, which tells callers
/// which replica answered.
pub fn resolve_hostname() -> String {
    let from_file = || std::fs::read_to_string("/etc/hostname").ok();
    pick_hostname(std::env::var("HOSTNAME").ok(), from_file)
}

fn pick_hostname<F>(env_value: Option<String>, from_file: F) -> String
where
    F: FnOnce() -> Option<String>,
{
    let non_empty = |value: String| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    };

    env_value
        .and_then(non_empty)
        .or_else(|| from_file().and_then(non_empty))
        .unwrap_or_else(|| FALLBACK_HOSTNAME.to_string())
}
