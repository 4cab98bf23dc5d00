use serde::{Deserialize, Serialize};

/// Health of one backend dependency (database, AI agent, configuration, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthState {
    Healthy,
    Degraded,
    Critical,
}

impl HealthState {
    pub fn is_healthy(self) -> bool {
        matches!(self, Self::Healthy)
    }
}

/// Health of a single named backend service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatus {
    pub name: String,
    pub status: HealthState,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub issue: Option<String>,
    pub last_checked: jiff::Timestamp,
    #[serde(default)]
    pub details: serde_json::Value,
}

/// Aggregate system health as reported by the status endpoint.
///
/// Fully derived from the latest poll; the client never mutates it locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatus {
    pub timestamp: jiff::Timestamp,
    pub overall_status: HealthState,
    pub services: Vec<ServiceStatus>,
    #[serde(default)]
    pub issues: Vec<String>,
}

impl SystemStatus {
    pub fn is_healthy(&self) -> bool {
        self.overall_status.is_healthy()
    }

    /// The non-healthy service rows, in report order.
    pub fn degraded_services(&self) -> impl Iterator<Item = &ServiceStatus> {
        self.services.iter().filter(|s| !s.status.is_healthy())
    }
}
