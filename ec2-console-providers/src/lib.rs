use anyhow::Result;
use async_trait::async_trait;
use ec2_console_common::{Instance, InstanceDetail, StateChange, StatusChecks};

/// The external instance-management API, as seen by the directory and the control relay.
///
/// Implementations hold no per-caller state: every call stands on its own.
#[async_trait]
pub trait InstanceProvider: Send + Sync {
    /// Short code used in logs and `/api/version` ("mock", "remote").
    fn name(&self) -> &'static str;

    /// Every instance visible to the configured account, no filtering.
    async fn describe_instances(&self) -> Result<Vec<Instance>>;

    /// Extended record for one instance.
    /// `Ok(None)` when the provider reports no matching reservation.
    async fn describe_instance(&self, instance_id: &str) -> Result<Option<InstanceDetail>>;

    // Optional: status-check summary for one instance.
    // Default implementation returns None (status unknown, not an error).
    async fn describe_instance_status(&self, _instance_id: &str) -> Result<Option<StatusChecks>> {
        Ok(None)
    }

    /// Requests a start for each ID and returns the provider's change summary.
    async fn start_instances(&self, instance_ids: &[String]) -> Result<Vec<StateChange>>;

    /// Requests a stop for each ID and returns the provider's change summary.
    async fn stop_instances(&self, instance_ids: &[String]) -> Result<Vec<StateChange>>;
}

#[cfg(feature = "mock")]
pub mod mock;

#[cfg(feature = "remote")]
pub mod remote;
