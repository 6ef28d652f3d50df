use axum::{
    extract::{Path, State},
    Json,
};
use ec2_console_common::{
    ConsoleError, ErrorResponse, InstanceDetailResponse, InvalidRequestReason,
    ListInstancesResponse,
};
use std::sync::Arc;

use crate::app::AppState;
use crate::directory;
use crate::error::ApiError;
use crate::locale::RequestLocale;

#[utoipa::path(
    get,
    path = "/api/ec2/instances",
    tag = "Instances",
    responses(
        (status = 200, description = "All instances and their state", body = ListInstancesResponse),
        (status = 500, description = "Provider unavailable", body = ErrorResponse)
    )
)]
pub async fn list_instances(
    State(state): State<Arc<AppState>>,
    RequestLocale(locale): RequestLocale,
) -> Result<Json<ListInstancesResponse>, ApiError> {
    let instances = directory::list_instances(state.provider.as_ref())
        .await
        .map_err(|e| ApiError::new(e, locale))?;
    tracing::debug!("listed {} instance(s)", instances.len());
    Ok(Json(ListInstancesResponse { instances }))
}

#[utoipa::path(
    get,
    path = "/api/ec2/instances/{id}",
    tag = "Instances",
    params(
        ("id" = String, Path, description = "Provider-assigned instance ID")
    ),
    responses(
        (status = 200, description = "Instance details", body = InstanceDetailResponse),
        (status = 400, description = "Missing instance ID", body = ErrorResponse),
        (status = 404, description = "Instance not found", body = ErrorResponse),
        (status = 500, description = "Provider unavailable", body = ErrorResponse)
    )
)]
pub async fn get_instance(
    State(state): State<Arc<AppState>>,
    RequestLocale(locale): RequestLocale,
    Path(id): Path<String>,
) -> Result<Json<InstanceDetailResponse>, ApiError> {
    if id.is_empty() {
        return Err(ApiError::new(
            ConsoleError::InvalidRequest(InvalidRequestReason::MissingInstanceId),
            locale,
        ));
    }
    let instance = directory::get_instance_detail(state.provider.as_ref(), &id)
        .await
        .map_err(|e| ApiError::new(e, locale))?;
    Ok(Json(InstanceDetailResponse { instance }))
}
