//! In-memory deployment ledger.
//!
//! The ledger is an append-only sequence of [`DeploymentRecord`]s. Identifiers
//! are assigned inside the same critical section as the insert, so the Nth
//! appended record always has id N and no two callers can observe the same id.
//! Records live only as long as the process.

use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Service name used when the request omits one
pub const DEFAULT_SERVICE: &str = "unknown";
/// Version used when the request omits one
pub const DEFAULT_VERSION: &str = "0.0.0";
/// Target environment used when the request omits one
pub const DEFAULT_ENVIRONMENT: &str = "dev";
/// Actor used when the request omits one
pub const DEFAULT_DEPLOYED_BY: &str = "manual";

/// Outcome of a recorded deployment.
///
/// Only successful deployments can be recorded through the API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentStatus {
    #[default]
    Success,
}

/// A single recorded deployment. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    pub id: u64,
    pub service: String,
    pub version: String,
    pub environment: String,
    pub deployed_by: String,
    pub timestamp: DateTime<Utc>,
    pub status: DeploymentStatus,
}

/// Caller-supplied fields for a new deployment. Every field is optional.
///
/// Strings are taken as-is, numbers and booleans are rendered as text, and
/// anything else (null, arrays, objects) counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewDeployment {
    #[serde(default, deserialize_with = "lenient_text")]
    pub service: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub version: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub environment: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub deployed_by: Option<String>,
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Missing and empty values both fall back to the default.
fn or_default(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl NewDeployment {
    /// Apply field defaults and build the record for the given id and time.
    pub fn into_record(self, id: u64, timestamp: DateTime<Utc>) -> DeploymentRecord {
        DeploymentRecord {
            id,
            service: or_default(self.service, DEFAULT_SERVICE),
            version: or_default(self.version, DEFAULT_VERSION),
            environment: or_default(self.environment, DEFAULT_ENVIRONMENT),
            deployed_by: or_default(self.deployed_by, DEFAULT_DEPLOYED_BY),
            timestamp,
            status: DeploymentStatus::Success,
        }
    }
}

/// Append-only, thread-safe collection of deployment records.
///
/// Share it between handlers with an `Arc`; each instance is independent.
#[derive(Debug, Default)]
pub struct Ledger {
    records: RwLock<Vec<DeploymentRecord>>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a deployment and return a copy of the stored record.
    ///
    /// Id assignment and insertion happen under one write lock. The push is
    /// the last step, so a poisoned lock never holds a partial record and is
    /// safe to recover.
    pub fn append(&self, input: NewDeployment) -> DeploymentRecord {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        let id = records.len() as u64 + 1;
        let record = input.into_record(id, Utc::now());
        records.push(record.clone());
        record
    }

    /// Point-in-time copy of every record, in append order.
    pub fn snapshot(&self) -> Vec<DeploymentRecord> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
