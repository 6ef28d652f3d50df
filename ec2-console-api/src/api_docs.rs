use crate::handlers::{control, instances};
use ec2_console_common::{
    BlockDevice, ControlAction, ControlRequest, ControlResponse, ErrorResponse, Instance,
    InstanceDetail, InstanceDetailResponse, ListInstancesResponse, SecurityGroup, StateChange,
    StateName, StatusChecks,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        instances::list_instances,
        instances::get_instance,
        control::control_instances
    ),
    components(
        schemas(
            Instance,
            InstanceDetail,
            SecurityGroup,
            BlockDevice,
            StatusChecks,
            ControlAction,
            ControlRequest,
            ControlResponse,
            StateChange,
            StateName,
            ListInstancesResponse,
            InstanceDetailResponse,
            ErrorResponse,
            crate::version::VersionInfo
        )
    ),
    tags(
        (name = "ec2-console", description = "EC2 instance directory and control API")
    )
)]
pub struct ApiDoc;
