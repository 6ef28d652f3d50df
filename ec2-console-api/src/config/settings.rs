use anyhow::{bail, Context, Result};
use ec2_console_common::Locale;
use std::env;
use std::net::{IpAddr, SocketAddr};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Mock,
    Remote,
}

impl ProviderKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" => Some(ProviderKind::Mock),
            "remote" => Some(ProviderKind::Remote),
            _ => None,
        }
    }
}

/// Runtime settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: IpAddr,
    pub port: u16,
    /// Explicit `PROVIDER`; `None` lets the provider manager decide.
    pub provider: Option<ProviderKind>,
    pub gateway_url: Option<String>,
    pub gateway_token: Option<String>,
    pub region: String,
    pub default_locale: Locale,
    /// Multiplier applied to every simulated delay (0 disables them).
    pub mock_latency_scale: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: 4000,
            provider: None,
            gateway_url: None,
            gateway_token: None,
            region: "ap-northeast-1".to_string(),
            default_locale: Locale::EnUs,
            mock_latency_scale: 1.0,
        }
    }
}

fn var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(var)
    }

    /// Same as `from_env` with an injectable lookup (tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut s = Settings::default();

        if let Some(host) = lookup("API_HOST") {
            s.host = host
                .parse()
                .with_context(|| format!("API_HOST '{}' is not an IP address", host))?;
        }
        if let Some(port) = lookup("API_PORT") {
            s.port = port
                .parse()
                .with_context(|| format!("API_PORT '{}' is not a port number", port))?;
        }
        if let Some(provider) = lookup("PROVIDER") {
            s.provider = Some(
                ProviderKind::parse(&provider).with_context(|| {
                    format!("PROVIDER '{}' must be 'mock' or 'remote'", provider)
                })?,
            );
        }
        s.gateway_url = lookup("EC2_GATEWAY_URL");
        s.gateway_token = lookup("EC2_GATEWAY_TOKEN");
        if let Some(region) = lookup("AWS_REGION") {
            s.region = region;
        }
        if let Some(locale) = lookup("DEFAULT_LOCALE") {
            s.default_locale = locale
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))
                .context("DEFAULT_LOCALE")?;
        }
        if let Some(scale) = lookup("MOCK_LATENCY_SCALE") {
            let scale: f64 = scale
                .parse()
                .with_context(|| format!("MOCK_LATENCY_SCALE '{}' is not a number", scale))?;
            if !scale.is_finite() || scale < 0.0 {
                bail!("MOCK_LATENCY_SCALE must be a non-negative number");
            }
            s.mock_latency_scale = scale;
        }

        if s.provider == Some(ProviderKind::Remote) && s.gateway_url.is_none() {
            bail!("PROVIDER=remote requires EC2_GATEWAY_URL");
        }
        Ok(s)
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
