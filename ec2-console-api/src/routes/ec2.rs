// Instance directory and control routes
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

use crate::app::AppState;
use crate::handlers::{control, instances};

pub fn create_ec2_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/ec2/instances", get(instances::list_instances))
        .route("/api/ec2/instances/{id}", get(instances::get_instance))
        .route("/api/ec2/control", post(control::control_instances))
        // Paths used by the first dashboard pages
        .route("/api/instances", get(instances::list_instances))
        .route("/api/control", post(control::control_instances))
}
