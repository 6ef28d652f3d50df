// Version information module

/// Version info response structure
#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct VersionInfo {
    pub version: String,
    /// Provider backing the directory and relay ("mock" or "remote").
    pub provider: String,
    pub server_time: chrono::DateTime<chrono::Utc>,
}

pub fn get_version_info(provider: &str) -> VersionInfo {
    VersionInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        provider: provider.to_string(),
        server_time: chrono::Utc::now(),
    }
}
