use serde::{Deserialize, Serialize};
use std::fmt;

/// Provider lifecycle status of a resource, e.g. `ACTIVE`, `STOPPED`, `RUNNING`.
///
/// Each OCI service has its own set of states, so this stays a thin wrapper
/// around the string the service returned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LifecycleState(String);

impl LifecycleState {
    pub const ACTIVE: &'static str = "ACTIVE";
    pub const INACTIVE: &'static str = "INACTIVE";
    pub const STOPPED: &'static str = "STOPPED";
    pub const FAILED: &'static str = "FAILED";
    pub const TERMINATED: &'static str = "TERMINATED";
    pub const TERMINATING: &'static str = "TERMINATING";

    pub fn new(state: impl Into<String>) -> Self {
        Self(state.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison against a state name.
    pub fn is(&self, state: &str) -> bool {
        self.0.eq_ignore_ascii_case(state)
    }

    pub fn is_any(&self, states: &[&str]) -> bool {
        states.iter().any(|s| self.is(s))
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutonomousDatabase {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub db_name: Option<String>,
    /// ECPU count. The API reports it as a float.
    #[serde(default)]
    pub compute_count: Option<f32>,
    pub lifecycle_state: LifecycleState,
}

impl AutonomousDatabase {
    /// Current ECPU count truncated to a whole number, as the console shows it.
    pub fn ecpu_count(&self) -> Option<u32> {
        self.compute_count.map(|c| c.max(0.0) as u32)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    pub id: String,
    pub display_name: String,
    pub lifecycle_state: LifecycleState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbSystem {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub lifecycle_state: LifecycleState,
}

/// Power actions accepted by the compute `InstanceAction` operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceAction {
    Start,
    SoftStop,
}

impl InstanceAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceAction::Start => "START",
            InstanceAction::SoftStop => "SOFTSTOP",
        }
    }
}

impl fmt::Display for InstanceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// MySQL shutdown mode; only the clean `SLOW` shutdown is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShutdownType {
    Slow,
}

/// Response metadata of an accepted asynchronous action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionReceipt {
    pub request_id: Option<String>,
    pub work_request_id: Option<String>,
}

impl fmt::Display for ActionReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "opc-request-id: {}, opc-work-request-id: {}",
            self.request_id.as_deref().unwrap_or("-"),
            self.work_request_id.as_deref().unwrap_or("-")
        )
    }
}
