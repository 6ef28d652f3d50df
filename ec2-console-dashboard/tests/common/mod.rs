// Test doubles for the dashboard controllers
#![allow(dead_code)]

use async_trait::async_trait;
use ec2_console_common::{
    ControlAction, ControlResponse, Instance, InstanceDetail, Locale, Message,
};
use ec2_console_dashboard::{ApiFailure, DashboardApi, DashboardConfig};
use ec2_console_providers::mock::{InstanceStore, SimulatedProvider, SimulationTiming};
use ec2_console_providers::InstanceProvider;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub const WEB: &str = "i-1234567890abcdef0";
pub const DB: &str = "i-0987654321fedcba0";

pub fn config() -> DashboardConfig {
    DashboardConfig::default()
}

/// Serves the views straight from the simulated backend, skipping HTTP.
pub struct SimulatedApi {
    provider: SimulatedProvider,
    locale: Locale,
    pub list_calls: AtomicUsize,
    pub control_calls: AtomicUsize,
}

impl SimulatedApi {
    pub fn new() -> Self {
        Self {
            provider: SimulatedProvider::new(InstanceStore::seeded(), SimulationTiming::default()),
            locale: Locale::EnUs,
            list_calls: AtomicUsize::new(0),
            control_calls: AtomicUsize::new(0),
        }
    }

    pub fn store(&self) -> &InstanceStore {
        self.provider.store()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn control_calls(&self) -> usize {
        self.control_calls.load(Ordering::SeqCst)
    }

    fn failure(&self, status: u16, message: Message) -> ApiFailure {
        ApiFailure {
            status: Some(status),
            message: message.text(self.locale),
        }
    }
}

#[async_trait]
impl DashboardApi for SimulatedApi {
    async fn list_instances(&self) -> Result<Vec<Instance>, ApiFailure> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.provider
            .describe_instances()
            .await
            .map_err(|_| self.failure(500, Message::ListFailed))
    }

    async fn get_instance(&self, instance_id: &str) -> Result<InstanceDetail, ApiFailure> {
        match self.provider.describe_instance(instance_id).await {
            Ok(Some(detail)) => Ok(detail),
            Ok(None) => Err(self.failure(404, Message::InstanceNotFound)),
            Err(_) => Err(self.failure(500, Message::DetailFailed)),
        }
    }

    async fn control(
        &self,
        action: ControlAction,
        instance_ids: &[String],
    ) -> Result<ControlResponse, ApiFailure> {
        self.control_calls.fetch_add(1, Ordering::SeqCst);
        let (result, message) = match action {
            ControlAction::Start => (
                self.provider.start_instances(instance_ids).await,
                Message::InstancesStarting,
            ),
            ControlAction::Stop => (
                self.provider.stop_instances(instance_ids).await,
                Message::InstancesStopping,
            ),
        };
        let details = result.map_err(|_| self.failure(500, Message::ControlFailed))?;
        Ok(ControlResponse {
            message: message.text(self.locale),
            details,
        })
    }
}

/// Replays queued list answers, each after its own delay. Control always fails.
#[derive(Default)]
pub struct ScriptedApi {
    lists: Mutex<VecDeque<(Duration, Result<Vec<Instance>, ApiFailure>)>>,
}

impl ScriptedApi {
    pub fn push_list(&self, delay: Duration, result: Result<Vec<Instance>, ApiFailure>) {
        self.lists.lock().unwrap().push_back((delay, result));
    }
}

#[async_trait]
impl DashboardApi for ScriptedApi {
    async fn list_instances(&self) -> Result<Vec<Instance>, ApiFailure> {
        let next = self.lists.lock().unwrap().pop_front();
        let (delay, result) = next.expect("unexpected list call");
        tokio::time::sleep(delay).await;
        result
    }

    async fn get_instance(&self, _instance_id: &str) -> Result<InstanceDetail, ApiFailure> {
        unreachable!("detail is not scripted")
    }

    async fn control(
        &self,
        _action: ControlAction,
        _instance_ids: &[String],
    ) -> Result<ControlResponse, ApiFailure> {
        tokio::time::sleep(Duration::from_millis(800)).await;
        Err(ApiFailure {
            status: Some(500),
            message: "Failed to operate the EC2 instances".into(),
        })
    }
}
