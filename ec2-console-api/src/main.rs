use anyhow::Context;
use ec2_console_api::app::AppState;
use ec2_console_api::config::Settings;
use ec2_console_api::provider_manager::ProviderManager;
use ec2_console_api::routes;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::from_env()?;
    let provider = ProviderManager::get_provider(&settings)?;
    let state = AppState::new(provider, settings.default_locale);
    let app = routes::create_app(state);

    let addr = settings.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("🚀 EC2 console API listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
