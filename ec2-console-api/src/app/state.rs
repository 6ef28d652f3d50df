use ec2_console_common::Locale;
use ec2_console_providers::InstanceProvider;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn InstanceProvider>,
    pub default_locale: Locale,
}

impl AppState {
    pub fn new(provider: Arc<dyn InstanceProvider>, default_locale: Locale) -> Arc<Self> {
        Arc::new(Self {
            provider,
            default_locale,
        })
    }
}
