use crate::InstanceProvider;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ec2_console_common::{
    BlockDevice, Instance, InstanceDetail, InstanceState, SecurityGroup, StateChange, StateName,
    StatusChecks,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::time::Duration;

const NOT_FOUND_CODES: [&str; 2] = ["InvalidInstanceID.NotFound", "InvalidInstanceID.Malformed"];

/// Client for an EC2-compatible JSON gateway.
///
/// Every operation is a `POST {base_url}/{Action}` with a PascalCase JSON body; responses use the
/// provider's own field names and are normalized here.
pub struct RemoteProvider {
    client: Client,
    base_url: String,
    region: String,
    api_token: Option<String>,
}

impl RemoteProvider {
    pub fn new(base_url: &str, region: &str, api_token: Option<String>) -> Result<Self> {
        // No overall timeout by default in reqwest; a stalled gateway would hang the request.
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(20))
            .build()
            .context("failed to build gateway HTTP client")?;
        let api_token = api_token
            .as_deref()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());
        Ok(Self {
            client,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            region: region.trim().to_string(),
            api_token,
        })
    }

    async fn call<T: DeserializeOwned>(
        &self,
        action: &str,
        body: serde_json::Value,
    ) -> Result<GatewayReply<T>> {
        let url = format!("{}/{}", self.base_url, action);
        tracing::debug!("🔵 [gateway] POST {} region={}", url, self.region);

        let mut req = self
            .client
            .post(&url)
            .header("X-Region", &self.region)
            .json(&body);
        if let Some(token) = &self.api_token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await.with_context(|| format!("{} request failed", action))?;

        let status = resp.status();
        if status.is_success() {
            let payload = resp
                .json::<T>()
                .await
                .with_context(|| format!("{} returned an unreadable body", action))?;
            return Ok(GatewayReply::Ok(payload));
        }

        let text = resp.text().await.unwrap_or_default();
        let error = serde_json::from_str::<GatewayErrorBody>(&text).ok();
        if let Some(code) = error.as_ref().and_then(|e| e.code()) {
            if NOT_FOUND_CODES.contains(&code) {
                return Ok(GatewayReply::NotFound);
            }
        }
        tracing::warn!(
            "❌ [gateway] {} failed: status={} body={}",
            action,
            status.as_u16(),
            text
        );
        Err(anyhow::anyhow!(
            "{} failed: status={} body={}",
            action,
            status.as_u16(),
            text
        ))
    }

    async fn control(&self, action: &str, instance_ids: &[String]) -> Result<Vec<StateChange>> {
        let body = json!({ "InstanceIds": instance_ids });
        match self.call::<ControlReply>(action, body).await? {
            GatewayReply::Ok(reply) => Ok(reply.changes()),
            GatewayReply::NotFound => Err(anyhow::anyhow!(
                "{} rejected: one or more instance IDs do not exist",
                action
            )),
        }
    }
}

enum GatewayReply<T> {
    Ok(T),
    NotFound,
}

// --- Wire types ---

#[derive(Deserialize)]
struct GatewayErrorBody {
    #[serde(rename = "Code")]
    code: Option<String>,
    #[serde(rename = "Errors", default)]
    errors: Vec<GatewayErrorItem>,
}

impl GatewayErrorBody {
    fn code(&self) -> Option<&str> {
        self.code
            .as_deref()
            .or_else(|| self.errors.iter().find_map(|e| e.code.as_deref()))
    }
}

#[derive(Deserialize)]
struct GatewayErrorItem {
    #[serde(rename = "Code")]
    code: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
struct DescribeInstancesReply {
    reservations: Vec<Reservation>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
struct Reservation {
    instances: Vec<WireInstance>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
struct WireState {
    name: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
struct WireTag {
    key: Option<String>,
    value: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
struct WirePlacement {
    availability_zone: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
struct WireGroup {
    group_id: Option<String>,
    group_name: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
struct WireEbs {
    volume_id: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
struct WireBlockDeviceMapping {
    device_name: Option<String>,
    ebs: Option<WireEbs>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
struct WireInstance {
    instance_id: Option<String>,
    instance_type: Option<String>,
    state: Option<WireState>,
    public_ip_address: Option<String>,
    private_ip_address: Option<String>,
    launch_time: Option<DateTime<Utc>>,
    tags: Vec<WireTag>,
    placement: Option<WirePlacement>,
    vpc_id: Option<String>,
    subnet_id: Option<String>,
    image_id: Option<String>,
    architecture: Option<String>,
    root_device_type: Option<String>,
    root_device_name: Option<String>,
    security_groups: Vec<WireGroup>,
    block_device_mappings: Vec<WireBlockDeviceMapping>,
}

fn wire_state(state: Option<WireState>) -> InstanceState {
    InstanceState::from(state.and_then(|s| s.name).unwrap_or_default())
}

impl WireInstance {
    fn summary(&mut self) -> Instance {
        let tags: BTreeMap<String, String> = std::mem::take(&mut self.tags)
            .into_iter()
            .filter_map(|t| Some((t.key?, t.value.unwrap_or_default())))
            .collect();
        Instance {
            id: self.instance_id.take().unwrap_or_default(),
            instance_type: self.instance_type.take().unwrap_or_default(),
            state: wire_state(self.state.take()),
            public_ip: self.public_ip_address.take(),
            private_ip: self.private_ip_address.take(),
            launch_time: self.launch_time,
            tags,
        }
    }

    fn into_detail(mut self) -> InstanceDetail {
        let summary = self.summary();
        InstanceDetail {
            summary,
            availability_zone: self.placement.and_then(|p| p.availability_zone),
            vpc_id: self.vpc_id,
            subnet_id: self.subnet_id,
            image_id: self.image_id,
            architecture: self.architecture,
            root_device_type: self.root_device_type,
            root_device_name: self.root_device_name,
            security_groups: self
                .security_groups
                .into_iter()
                .map(|g| SecurityGroup {
                    id: g.group_id.unwrap_or_default(),
                    name: g.group_name.unwrap_or_default(),
                })
                .collect(),
            block_devices: self
                .block_device_mappings
                .into_iter()
                .map(|b| BlockDevice {
                    device_name: b.device_name.unwrap_or_default(),
                    volume_id: b.ebs.and_then(|e| e.volume_id),
                })
                .collect(),
            status_checks: StatusChecks::default(),
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
struct StatusSummary {
    status: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
struct WireInstanceStatus {
    system_status: Option<StatusSummary>,
    instance_status: Option<StatusSummary>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
struct DescribeInstanceStatusReply {
    instance_statuses: Vec<WireInstanceStatus>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
struct WireStateChange {
    instance_id: Option<String>,
    current_state: Option<WireState>,
    previous_state: Option<WireState>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
struct ControlReply {
    starting_instances: Vec<WireStateChange>,
    stopping_instances: Vec<WireStateChange>,
}

impl ControlReply {
    fn changes(self) -> Vec<StateChange> {
        self.starting_instances
            .into_iter()
            .chain(self.stopping_instances)
            .map(|c| StateChange {
                instance_id: c.instance_id.unwrap_or_default(),
                current_state: StateName::from(wire_state(c.current_state)),
                previous_state: StateName::from(wire_state(c.previous_state)),
            })
            .collect()
    }
}

#[async_trait]
impl InstanceProvider for RemoteProvider {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn describe_instances(&self) -> Result<Vec<Instance>> {
        match self
            .call::<DescribeInstancesReply>("DescribeInstances", json!({}))
            .await?
        {
            GatewayReply::Ok(reply) => Ok(reply
                .reservations
                .into_iter()
                .flat_map(|r| r.instances)
                .map(|mut i| i.summary())
                .collect()),
            GatewayReply::NotFound => Ok(vec![]),
        }
    }

    async fn describe_instance(&self, instance_id: &str) -> Result<Option<InstanceDetail>> {
        let body = json!({ "InstanceIds": [instance_id] });
        match self.call::<DescribeInstancesReply>("DescribeInstances", body).await? {
            GatewayReply::Ok(reply) => Ok(reply
                .reservations
                .into_iter()
                .next()
                .and_then(|r| r.instances.into_iter().next())
                .map(WireInstance::into_detail)),
            GatewayReply::NotFound => Ok(None),
        }
    }

    async fn describe_instance_status(&self, instance_id: &str) -> Result<Option<StatusChecks>> {
        let body = json!({ "InstanceIds": [instance_id], "IncludeAllInstances": true });
        match self
            .call::<DescribeInstanceStatusReply>("DescribeInstanceStatus", body)
            .await?
        {
            GatewayReply::Ok(reply) => Ok(reply.instance_statuses.into_iter().next().map(|s| {
                StatusChecks {
                    system_status: s.system_status.and_then(|x| x.status),
                    instance_status: s.instance_status.and_then(|x| x.status),
                }
            })),
            GatewayReply::NotFound => Ok(None),
        }
    }

    async fn start_instances(&self, instance_ids: &[String]) -> Result<Vec<StateChange>> {
        self.control("StartInstances", instance_ids).await
    }

    async fn stop_instances(&self, instance_ids: &[String]) -> Result<Vec<StateChange>> {
        self.control("StopInstances", instance_ids).await
    }
}
