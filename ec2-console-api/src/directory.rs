// Instance directory: read-only listing and detail over the configured provider.

use ec2_console_common::{ConsoleError, DirectoryOperation, Instance, InstanceDetail};
use ec2_console_providers::InstanceProvider;

pub async fn list_instances(
    provider: &dyn InstanceProvider,
) -> Result<Vec<Instance>, ConsoleError> {
    provider.describe_instances().await.map_err(|e| {
        tracing::error!("EC2 instance list failed ({}): {:?}", provider.name(), e);
        ConsoleError::DirectoryUnavailable(DirectoryOperation::List)
    })
}

/// Detail record with the status-check lookup merged in.
///
/// A failed or empty status lookup leaves the status as reported by describe (usually unknown).
pub async fn get_instance_detail(
    provider: &dyn InstanceProvider,
    instance_id: &str,
) -> Result<InstanceDetail, ConsoleError> {
    let mut detail = provider
        .describe_instance(instance_id)
        .await
        .map_err(|e| {
            tracing::error!(
                "EC2 instance detail failed for {} ({}): {:?}",
                instance_id,
                provider.name(),
                e
            );
            ConsoleError::DirectoryUnavailable(DirectoryOperation::Detail)
        })?
        .ok_or_else(|| ConsoleError::InstanceNotFound(instance_id.to_string()))?;

    match provider.describe_instance_status(instance_id).await {
        Ok(Some(status)) => detail.status_checks = status,
        Ok(None) => {}
        Err(e) => {
            tracing::warn!("status check lookup failed for {}: {:?}", instance_id, e);
        }
    }

    Ok(detail)
}
