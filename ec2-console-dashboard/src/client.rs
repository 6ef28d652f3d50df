use anyhow::{Context, Result};
use async_trait::async_trait;
use ec2_console_common::{
    ControlAction, ControlResponse, ErrorResponse, Instance, InstanceDetail,
    InstanceDetailResponse, ListInstancesResponse, Locale, Message,
};
use reqwest::header::ACCEPT_LANGUAGE;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;

use crate::config::DashboardConfig;

/// A failed call as the views see it: an optional HTTP status and a displayable message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiFailure {
    /// `None` when the request never produced a response.
    pub status: Option<u16>,
    pub message: String,
}

#[async_trait]
pub trait DashboardApi: Send + Sync {
    async fn list_instances(&self) -> Result<Vec<Instance>, ApiFailure>;
    async fn get_instance(&self, instance_id: &str) -> Result<InstanceDetail, ApiFailure>;
    async fn control(
        &self,
        action: ControlAction,
        instance_ids: &[String],
    ) -> Result<ControlResponse, ApiFailure>;
}

/// `DashboardApi` over the console HTTP API.
pub struct HttpDashboardApi {
    client: Client,
    base_url: String,
    locale: Locale,
}

impl HttpDashboardApi {
    pub fn new(config: &DashboardConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(config.request_timeout)
            .build()
            .context("failed to build dashboard HTTP client")?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            locale: config.locale,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        fallback: Message,
    ) -> Result<T, ApiFailure> {
        let generic = |status: Option<u16>| ApiFailure {
            status,
            message: fallback.text(self.locale),
        };

        let resp = request
            .header(ACCEPT_LANGUAGE, self.locale.code())
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("dashboard request failed: {}", e);
                generic(None)
            })?;

        let status = resp.status();
        if status.is_success() {
            return resp.json::<T>().await.map_err(|e| {
                tracing::warn!("dashboard response unreadable: {}", e);
                generic(Some(status.as_u16()))
            });
        }

        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .ok()
            .map(|e| e.error)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| fallback.text(self.locale));
        tracing::debug!("dashboard call returned {}: {}", status.as_u16(), message);
        Err(ApiFailure {
            status: Some(status.as_u16()),
            message,
        })
    }
}

#[async_trait]
impl DashboardApi for HttpDashboardApi {
    async fn list_instances(&self) -> Result<Vec<Instance>, ApiFailure> {
        let request = self.client.get(self.url("/api/ec2/instances"));
        let body: ListInstancesResponse = self.send(request, Message::ListLoadError).await?;
        Ok(body.instances)
    }

    async fn get_instance(&self, instance_id: &str) -> Result<InstanceDetail, ApiFailure> {
        // IDs are opaque; one path segment whatever they contain.
        let path = format!("/api/ec2/instances/{}", urlencoding::encode(instance_id));
        let request = self.client.get(self.url(&path));
        let body: InstanceDetailResponse = self.send(request, Message::DetailLoadError).await?;
        Ok(body.instance)
    }

    async fn control(
        &self,
        action: ControlAction,
        instance_ids: &[String],
    ) -> Result<ControlResponse, ApiFailure> {
        let request = self
            .client
            .post(self.url("/api/ec2/control"))
            .json(&json!({ "action": action.as_str(), "instanceIds": instance_ids }));
        self.send(request, Message::ActionFailed).await
    }
}
