// Public routes (banner, version, API docs)
use crate::app::AppState;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_docs;
use crate::version;

/// Create public routes router
pub fn create_public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", api_docs::ApiDoc::openapi()),
        )
        .route("/", get(root))
        .route("/api/version", get(get_version))
}

async fn get_version(State(state): State<Arc<AppState>>) -> Json<version::VersionInfo> {
    Json(version::get_version_info(state.provider.name()))
}

async fn root() -> &'static str {
    "EC2 Console API"
}
