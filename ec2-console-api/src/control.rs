// Instance control relay: validates start/stop requests and forwards them to the provider.
// Stateless; nothing is remembered between calls.

use ec2_console_common::{
    ConsoleError, ControlAction, ControlRequest, ControlResponse, InvalidRequestReason, Locale,
    Message,
};
use ec2_console_providers::InstanceProvider;
use serde_json::Value;

fn invalid() -> ConsoleError {
    ConsoleError::InvalidRequest(InvalidRequestReason::InvalidParameters)
}

/// Parses a raw request body into a `ControlRequest`.
///
/// Parameter checks come first (body shape, action present, IDs a non-empty list of strings),
/// then the action value itself, so an unknown action is only reported for an otherwise
/// well-formed request.
pub fn parse_control_request(body: &[u8]) -> Result<ControlRequest, ConsoleError> {
    let value: Value = serde_json::from_slice(body).map_err(|_| invalid())?;
    let action = value
        .get("action")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(invalid)?;
    let ids = value
        .get("instanceIds")
        .and_then(Value::as_array)
        .ok_or_else(invalid)?;
    let instance_ids = ids
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect::<Option<Vec<String>>>()
        .ok_or_else(invalid)?;
    if instance_ids.is_empty() {
        return Err(invalid());
    }

    let action = ControlAction::parse(action).ok_or_else(|| {
        ConsoleError::InvalidRequest(InvalidRequestReason::UnknownAction(action.to_string()))
    })?;
    ControlRequest::new(action, instance_ids)
}

/// Forwards a validated request and wraps the provider's change summary.
pub async fn relay(
    provider: &dyn InstanceProvider,
    request: &ControlRequest,
    locale: Locale,
) -> Result<ControlResponse, ConsoleError> {
    let result = match request.action {
        ControlAction::Start => provider.start_instances(&request.instance_ids).await,
        ControlAction::Stop => provider.stop_instances(&request.instance_ids).await,
    };
    let details = result.map_err(|e| {
        tracing::error!(
            "EC2 {} failed for {:?} ({}): {:?}",
            request.action,
            request.instance_ids,
            provider.name(),
            e
        );
        ConsoleError::ControlFailed
    })?;

    let message = match request.action {
        ControlAction::Start => Message::InstancesStarting,
        ControlAction::Stop => Message::InstancesStopping,
    };
    Ok(ControlResponse {
        message: message.text(locale),
        details,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Result<ControlRequest, ConsoleError> {
        parse_control_request(body.as_bytes())
    }

    #[test]
    fn accepts_well_formed_request() {
        let req = parse(r#"{"action":"stop","instanceIds":["i-2","i-1","i-2"]}"#).unwrap();
        assert_eq!(req.action, ControlAction::Stop);
        assert_eq!(req.instance_ids, vec!["i-2", "i-1", "i-2"]);
    }

    #[test]
    fn rejects_invalid_parameters() {
        for body in [
            "",
            "not json",
            "[]",
            r#"{"instanceIds":["i-1"]}"#,
            r#"{"action":"","instanceIds":["i-1"]}"#,
            r#"{"action":"start"}"#,
            r#"{"action":"start","instanceIds":[]}"#,
            r#"{"action":"start","instanceIds":"i-1"}"#,
            r#"{"action":"start","instanceIds":[1,2]}"#,
            r#"{"action":7,"instanceIds":["i-1"]}"#,
        ] {
            assert_eq!(
                parse(body).unwrap_err(),
                ConsoleError::InvalidRequest(InvalidRequestReason::InvalidParameters),
                "body: {}",
                body
            );
        }
    }

    #[test]
    fn unknown_action_is_echoed() {
        assert_eq!(
            parse(r#"{"action":"reboot","instanceIds":["i-1"]}"#).unwrap_err(),
            ConsoleError::InvalidRequest(InvalidRequestReason::UnknownAction("reboot".into()))
        );
    }
}
