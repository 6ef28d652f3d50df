use anyhow::Result;
use ec2_console_providers::mock::{InstanceStore, SimulatedProvider, SimulationTiming};
use ec2_console_providers::remote::RemoteProvider;
use ec2_console_providers::InstanceProvider;
use std::sync::Arc;

use crate::config::{ProviderKind, Settings};

pub struct ProviderManager;

impl ProviderManager {
    /// `PROVIDER` when set, otherwise remote as soon as a gateway URL is configured.
    pub fn resolve_kind(settings: &Settings) -> ProviderKind {
        match (settings.provider, settings.gateway_url.as_deref()) {
            (Some(kind), _) => kind,
            (None, Some(_)) => ProviderKind::Remote,
            (None, None) => ProviderKind::Mock,
        }
    }

    pub fn get_provider(settings: &Settings) -> Result<Arc<dyn InstanceProvider>> {
        match Self::resolve_kind(settings) {
            ProviderKind::Remote => {
                let url = settings.gateway_url.as_deref().ok_or_else(|| {
                    anyhow::anyhow!("EC2_GATEWAY_URL must be set for the remote provider")
                })?;
                let provider =
                    RemoteProvider::new(url, &settings.region, settings.gateway_token.clone())?;
                tracing::info!("☁️ remote provider: {} (region {})", url, settings.region);
                Ok(Arc::new(provider))
            }
            ProviderKind::Mock => {
                let timing = SimulationTiming::default().scaled(settings.mock_latency_scale);
                tracing::info!(
                    "🧪 simulated provider (latency scale {})",
                    settings.mock_latency_scale
                );
                Ok(Arc::new(SimulatedProvider::new(InstanceStore::seeded(), timing)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_url_selects_remote() {
        let mut settings = Settings::default();
        assert_eq!(ProviderManager::resolve_kind(&settings), ProviderKind::Mock);

        settings.gateway_url = Some("http://gw:9000".into());
        assert_eq!(ProviderManager::resolve_kind(&settings), ProviderKind::Remote);

        settings.provider = Some(ProviderKind::Mock);
        assert_eq!(ProviderManager::resolve_kind(&settings), ProviderKind::Mock);
    }

    #[test]
    fn builds_named_providers() {
        let settings = Settings::default();
        assert_eq!(ProviderManager::get_provider(&settings).unwrap().name(), "mock");

        let settings = Settings {
            gateway_url: Some("http://127.0.0.1:9".into()),
            ..Settings::default()
        };
        assert_eq!(ProviderManager::get_provider(&settings).unwrap().name(), "remote");
    }
}
