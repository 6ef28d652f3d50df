use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub mod error;
pub mod i18n;

pub use error::{ConsoleError, DirectoryOperation, InvalidRequestReason};
pub use i18n::{Locale, Message};

// --- Enums ---

/// Lifecycle state as reported by the provider.
///
/// The four states driven by the simulated backend are named; anything else the
/// provider reports is carried through verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InstanceState {
    Pending,
    Running,
    Stopping,
    Stopped,
    ShuttingDown,
    Terminated,
    Other(String),
}

impl InstanceState {
    pub fn as_str(&self) -> &str {
        match self {
            InstanceState::Pending => "pending",
            InstanceState::Running => "running",
            InstanceState::Stopping => "stopping",
            InstanceState::Stopped => "stopped",
            InstanceState::ShuttingDown => "shutting-down",
            InstanceState::Terminated => "terminated",
            InstanceState::Other(s) => s.as_str(),
        }
    }

    /// The only control action the provider will honor from this state.
    pub fn valid_action(&self) -> Option<ControlAction> {
        match self {
            InstanceState::Stopped => Some(ControlAction::Start),
            InstanceState::Running => Some(ControlAction::Stop),
            _ => None,
        }
    }
}

impl From<String> for InstanceState {
    fn from(s: String) -> Self {
        match s.as_str() {
            "pending" => InstanceState::Pending,
            "running" => InstanceState::Running,
            "stopping" => InstanceState::Stopping,
            "stopped" => InstanceState::Stopped,
            "shutting-down" => InstanceState::ShuttingDown,
            "terminated" => InstanceState::Terminated,
            _ => InstanceState::Other(s),
        }
    }
}

impl From<&str> for InstanceState {
    fn from(s: &str) -> Self {
        InstanceState::from(s.to_string())
    }
}

impl From<InstanceState> for String {
    fn from(state: InstanceState) -> Self {
        match state {
            InstanceState::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ControlAction {
    Start,
    Stop,
}

impl ControlAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlAction::Start => "start",
            ControlAction::Stop => "stop",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "start" => Some(ControlAction::Start),
            "stop" => Some(ControlAction::Stop),
            _ => None,
        }
    }
}

impl fmt::Display for ControlAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Read models ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    pub id: String,
    #[serde(rename = "type")]
    pub instance_type: String,
    #[schema(value_type = String, example = "running")]
    pub state: InstanceState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launch_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl Instance {
    /// Value of the `Name` tag, if any.
    pub fn name(&self) -> Option<&str> {
        self.tags.get("Name").map(|s| s.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SecurityGroup {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlockDevice {
    pub device_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_id: Option<String>,
}

/// Health summary from the provider's status-check lookup.
/// `None` means the provider had nothing to report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusChecks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstanceDetail {
    #[serde(flatten)]
    pub summary: Instance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpc_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnet_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub architecture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_device_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_device_name: Option<String>,
    #[serde(default)]
    pub security_groups: Vec<SecurityGroup>,
    #[serde(default)]
    pub block_devices: Vec<BlockDevice>,
    #[serde(default)]
    pub status_checks: StatusChecks,
}

impl InstanceDetail {
    pub fn id(&self) -> &str {
        &self.summary.id
    }

    pub fn state(&self) -> &InstanceState {
        &self.summary.state
    }
}

// --- Control ---

/// A validated start/stop request. IDs are non-empty and kept in submission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ControlRequest {
    pub action: ControlAction,
    pub instance_ids: Vec<String>,
}

impl ControlRequest {
    pub fn new(action: ControlAction, instance_ids: Vec<String>) -> Result<Self, ConsoleError> {
        if instance_ids.is_empty() {
            return Err(ConsoleError::InvalidRequest(
                InvalidRequestReason::InvalidParameters,
            ));
        }
        Ok(Self {
            action,
            instance_ids,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct StateName {
    #[serde(rename = "Name")]
    #[schema(value_type = String)]
    pub name: InstanceState,
}

impl From<InstanceState> for StateName {
    fn from(name: InstanceState) -> Self {
        Self { name }
    }
}

/// Per-instance transition record, in the provider's own change-summary shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct StateChange {
    #[serde(rename = "InstanceId")]
    pub instance_id: String,
    #[serde(rename = "CurrentState")]
    pub current_state: StateName,
    #[serde(rename = "PreviousState")]
    pub previous_state: StateName,
}

impl StateChange {
    pub fn new(
        instance_id: impl Into<String>,
        current: InstanceState,
        previous: InstanceState,
    ) -> Self {
        Self {
            instance_id: instance_id.into(),
            current_state: current.into(),
            previous_state: previous.into(),
        }
    }
}

// --- Envelopes ---

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ListInstancesResponse {
    pub instances: Vec<Instance>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct InstanceDetailResponse {
    pub instance: InstanceDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ControlResponse {
    pub message: String,
    pub details: Vec<StateChange>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Localized, human readable.
    pub error: String,
    /// Machine-oriented failure category.
    #[serde(default)]
    pub code: Option<String>,
}
