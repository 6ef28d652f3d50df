// Routes module - Centralizes all route definitions
pub mod ec2;
pub mod public;

use axum::Router;
use crate::app::AppState;
use std::sync::Arc;

/// Build the main application router
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(public::create_public_routes())
        .merge(ec2::create_ec2_routes())
}

/// Router with state and CORS applied, as served by `main`.
pub fn create_app(state: Arc<AppState>) -> Router {
    create_router()
        .layer(crate::app::create_cors())
        .with_state(state)
}
