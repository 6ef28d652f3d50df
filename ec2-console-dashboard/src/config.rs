use anyhow::{Context, Result};
use ec2_console_common::Locale;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub api_base_url: String,
    pub locale: Locale,
    /// Wait between a successful control action and the follow-up refresh.
    pub refresh_delay: Duration,
    pub request_timeout: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:4000".to_string(),
            locale: Locale::EnUs,
            refresh_delay: Duration::from_millis(2000),
            request_timeout: Duration::from_secs(15),
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| {
            env::var(name)
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = DashboardConfig::default();
        if let Some(url) = lookup("DASHBOARD_API_URL") {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(locale) = lookup("DASHBOARD_LOCALE") {
            config.locale = locale
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))
                .context("DASHBOARD_LOCALE")?;
        }
        Ok(config)
    }
}
