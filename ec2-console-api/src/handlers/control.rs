use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use ec2_console_common::{ControlRequest, ControlResponse, ErrorResponse};
use std::sync::Arc;

use crate::app::AppState;
use crate::control;
use crate::error::ApiError;
use crate::locale::RequestLocale;

/// POST /api/ec2/control - Start or stop instances
///
/// The body is read raw so every malformed shape maps to the same 400 envelope.
#[utoipa::path(
    post,
    path = "/api/ec2/control",
    tag = "Control",
    request_body = ControlRequest,
    responses(
        (status = 200, description = "Action accepted by the provider", body = ControlResponse),
        (status = 400, description = "Invalid parameters or unknown action", body = ErrorResponse),
        (status = 500, description = "Provider failed the action", body = ErrorResponse)
    )
)]
pub async fn control_instances(
    State(state): State<Arc<AppState>>,
    RequestLocale(locale): RequestLocale,
    body: Bytes,
) -> Result<Json<ControlResponse>, ApiError> {
    let request = control::parse_control_request(&body).map_err(|e| {
        tracing::debug!("rejected control request: {}", e);
        ApiError::new(e, locale)
    })?;
    tracing::info!(
        "⚙️ control {} for {} instance(s)",
        request.action,
        request.instance_ids.len()
    );
    let response = control::relay(state.provider.as_ref(), &request, locale)
        .await
        .map_err(|e| ApiError::new(e, locale))?;
    Ok(Json(response))
}
