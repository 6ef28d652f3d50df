use crate::InstanceProvider;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use ec2_console_common::{
    BlockDevice, ControlAction, Instance, InstanceDetail, InstanceState, SecurityGroup,
    StateChange, StatusChecks,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Artificial delays of the simulated backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationTiming {
    pub list_latency: Duration,
    pub detail_latency: Duration,
    pub control_latency: Duration,
    /// pending -> running and stopping -> stopped
    pub transition_delay: Duration,
}

impl Default for SimulationTiming {
    fn default() -> Self {
        Self {
            list_latency: Duration::from_millis(500),
            detail_latency: Duration::from_millis(500),
            control_latency: Duration::from_millis(800),
            transition_delay: Duration::from_millis(2000),
        }
    }
}

impl SimulationTiming {
    /// Scales every delay. `factor` must be finite and non-negative.
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            list_latency: self.list_latency.mul_f64(factor),
            detail_latency: self.detail_latency.mul_f64(factor),
            control_latency: self.control_latency.mul_f64(factor),
            transition_delay: self.transition_delay.mul_f64(factor),
        }
    }
}

struct Slot {
    state: InstanceState,
    /// Bumped on every scheduled transition; a timer only writes if its epoch is still current.
    epoch: u64,
    transition: Option<JoinHandle<()>>,
}

impl Slot {
    fn new(state: InstanceState) -> Self {
        Self {
            state,
            epoch: 0,
            transition: None,
        }
    }

    fn cancel_transition(&mut self) {
        if let Some(handle) = self.transition.take() {
            handle.abort();
        }
    }
}

/// Simulated lifecycle mapping, instance ID -> current state.
///
/// Cloning yields another handle on the same mapping. Each store is independent, so tests
/// build their own and nothing is shared across the process.
#[derive(Clone)]
pub struct InstanceStore {
    catalog: Arc<Vec<Instance>>,
    slots: Arc<Mutex<HashMap<String, Slot>>>,
}

impl InstanceStore {
    pub fn new(catalog: Vec<Instance>) -> Self {
        let slots = catalog
            .iter()
            .map(|inst| (inst.id.clone(), Slot::new(inst.state.clone())))
            .collect();
        Self {
            catalog: Arc::new(catalog),
            slots: Arc::new(Mutex::new(slots)),
        }
    }

    /// Store seeded from the default four-instance catalog.
    pub fn seeded() -> Self {
        Self::new(default_catalog())
    }

    pub async fn state_of(&self, instance_id: &str) -> Option<InstanceState> {
        self.slots
            .lock()
            .await
            .get(instance_id)
            .map(|slot| slot.state.clone())
    }

    /// Back to the seeded states; pending transitions are cancelled.
    pub async fn reset(&self) {
        let mut slots = self.slots.lock().await;
        for inst in self.catalog.iter() {
            match slots.get_mut(&inst.id) {
                Some(slot) => {
                    slot.cancel_transition();
                    slot.epoch += 1;
                    slot.state = inst.state.clone();
                }
                None => {
                    slots.insert(inst.id.clone(), Slot::new(inst.state.clone()));
                }
            }
        }
    }

    /// Catalog entries with their current state, in catalog order.
    pub async fn snapshot(&self) -> Vec<Instance> {
        let slots = self.slots.lock().await;
        self.catalog
            .iter()
            .map(|inst| {
                let mut inst = inst.clone();
                if let Some(slot) = slots.get(&inst.id) {
                    inst.state = slot.state.clone();
                }
                inst
            })
            .collect()
    }

    /// Applies `action` to every ID currently in the action's source state.
    /// Anything else (wrong state, unknown ID, duplicate) is left untouched.
    /// Returns the IDs that actually moved.
    pub async fn apply(
        &self,
        action: ControlAction,
        instance_ids: &[String],
        delay: Duration,
    ) -> Vec<String> {
        let (from, interim, settled) = match action {
            ControlAction::Start => (
                InstanceState::Stopped,
                InstanceState::Pending,
                InstanceState::Running,
            ),
            ControlAction::Stop => (
                InstanceState::Running,
                InstanceState::Stopping,
                InstanceState::Stopped,
            ),
        };

        let mut moved = Vec::new();
        let mut slots = self.slots.lock().await;
        for id in instance_ids {
            let Some(slot) = slots.get_mut(id) else {
                tracing::debug!("[mock] {} ignored for unknown instance {}", action, id);
                continue;
            };
            if slot.state != from {
                tracing::debug!(
                    "[mock] {} is a no-op for {} (state={})",
                    action,
                    id,
                    slot.state
                );
                continue;
            }
            slot.state = interim.clone();
            slot.epoch += 1;
            slot.cancel_transition();
            slot.transition = Some(self.schedule_transition(
                id.clone(),
                slot.epoch,
                settled.clone(),
                delay,
            ));
            moved.push(id.clone());
        }
        moved
    }

    fn schedule_transition(
        &self,
        instance_id: String,
        epoch: u64,
        target: InstanceState,
        delay: Duration,
    ) -> JoinHandle<()> {
        let slots = Arc::clone(&self.slots);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut slots = slots.lock().await;
            let Some(slot) = slots.get_mut(&instance_id) else {
                return;
            };
            if slot.epoch != epoch {
                // superseded by a later transition or a reset
                return;
            }
            tracing::info!(
                "🔄 [mock] {}: {} -> {}",
                instance_id,
                slot.state,
                target
            );
            slot.state = target;
            slot.transition = None;
        })
    }
}

impl Default for InstanceStore {
    fn default() -> Self {
        Self::seeded()
    }
}

/// Status checks derived from state: `ok` while running, otherwise `not-applicable`.
pub fn derived_status_checks(state: &InstanceState) -> StatusChecks {
    let status = if *state == InstanceState::Running {
        "ok"
    } else {
        "not-applicable"
    };
    StatusChecks {
        system_status: Some(status.to_string()),
        instance_status: Some(status.to_string()),
    }
}

pub fn default_catalog() -> Vec<Instance> {
    let seed = [
        (
            "i-1234567890abcdef0",
            "t2.micro",
            "running",
            Some("203.0.113.1"),
            "10.0.0.1",
            1,
            "テスト用Webサーバー",
        ),
        ("i-0987654321fedcba0", "t3.small", "stopped", None, "10.0.0.2", 2, "テスト用DBサーバー"),
        (
            "i-abcdef1234567890",
            "t3.medium",
            "running",
            Some("203.0.113.3"),
            "10.0.0.3",
            3,
            "テスト用アプリサーバー",
        ),
        ("i-fedcba0987654321", "t2.small", "stopped", None, "10.0.0.4", 4, "バッチ処理サーバー"),
    ];
    seed.into_iter()
        .map(|(id, ty, state, public_ip, private_ip, day, name)| Instance {
            id: id.to_string(),
            instance_type: ty.to_string(),
            state: InstanceState::from(state),
            public_ip: public_ip.map(str::to_string),
            private_ip: Some(private_ip.to_string()),
            launch_time: Utc.with_ymd_and_hms(2023, 1, day, 0, 0, 0).single(),
            tags: BTreeMap::from([("Name".to_string(), name.to_string())]),
        })
        .collect()
}

fn simulated_detail(summary: Instance) -> InstanceDetail {
    let status_checks = derived_status_checks(&summary.state);
    InstanceDetail {
        summary,
        availability_zone: Some("ap-northeast-1a".into()),
        vpc_id: Some("vpc-12345678".into()),
        subnet_id: Some("subnet-12345678".into()),
        image_id: Some("ami-12345678".into()),
        architecture: Some("x86_64".into()),
        root_device_type: Some("ebs".into()),
        root_device_name: Some("/dev/sda1".into()),
        security_groups: vec![
            SecurityGroup {
                id: "sg-12345678".into(),
                name: "default".into(),
            },
            SecurityGroup {
                id: "sg-87654321".into(),
                name: "web-server".into(),
            },
        ],
        block_devices: vec![
            BlockDevice {
                device_name: "/dev/sda1".into(),
                volume_id: Some("vol-12345678".into()),
            },
            BlockDevice {
                device_name: "/dev/sdf".into(),
                volume_id: Some("vol-87654321".into()),
            },
        ],
        status_checks,
    }
}

/// In-memory stand-in for the provider, used when no real gateway is configured.
pub struct SimulatedProvider {
    store: InstanceStore,
    timing: SimulationTiming,
}

impl SimulatedProvider {
    pub fn new(store: InstanceStore, timing: SimulationTiming) -> Self {
        Self { store, timing }
    }

    pub fn store(&self) -> &InstanceStore {
        &self.store
    }

    async fn control(&self, action: ControlAction, instance_ids: &[String]) -> Vec<StateChange> {
        tokio::time::sleep(self.timing.control_latency).await;

        let moved = self
            .store
            .apply(action, instance_ids, self.timing.transition_delay)
            .await;
        tracing::info!(
            "🟢 [mock] {} requested for {} instance(s), {} transitioned",
            action,
            instance_ids.len(),
            moved.len()
        );

        // Every requested ID is reported as transitioned, no-ops included.
        let (current, previous) = match action {
            ControlAction::Start => (InstanceState::Pending, InstanceState::Stopped),
            ControlAction::Stop => (InstanceState::Stopping, InstanceState::Running),
        };
        instance_ids
            .iter()
            .map(|id| StateChange::new(id.clone(), current.clone(), previous.clone()))
            .collect()
    }
}

impl Default for SimulatedProvider {
    fn default() -> Self {
        Self::new(InstanceStore::seeded(), SimulationTiming::default())
    }
}

#[async_trait]
impl InstanceProvider for SimulatedProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn describe_instances(&self) -> Result<Vec<Instance>> {
        tokio::time::sleep(self.timing.list_latency).await;
        Ok(self.store.snapshot().await)
    }

    async fn describe_instance(&self, instance_id: &str) -> Result<Option<InstanceDetail>> {
        tokio::time::sleep(self.timing.detail_latency).await;
        // Status checks come from the same snapshot as the state they describe.
        Ok(self
            .store
            .snapshot()
            .await
            .into_iter()
            .find(|inst| inst.id == instance_id)
            .map(simulated_detail))
    }

    async fn start_instances(&self, instance_ids: &[String]) -> Result<Vec<StateChange>> {
        Ok(self.control(ControlAction::Start, instance_ids).await)
    }

    async fn stop_instances(&self, instance_ids: &[String]) -> Result<Vec<StateChange>> {
        Ok(self.control(ControlAction::Stop, instance_ids).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STOPPED_ID: &str = "i-0987654321fedcba0";
    const RUNNING_ID: &str = "i-1234567890abcdef0";

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn start_goes_pending_then_running_after_delay() {
        let provider = SimulatedProvider::default();
        let store = provider.store().clone();

        provider.start_instances(&ids(&[STOPPED_ID])).await.unwrap();
        assert_eq!(store.state_of(STOPPED_ID).await, Some(InstanceState::Pending));

        tokio::time::sleep(Duration::from_millis(1999)).await;
        assert_eq!(store.state_of(STOPPED_ID).await, Some(InstanceState::Pending));

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(store.state_of(STOPPED_ID).await, Some(InstanceState::Running));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_goes_stopping_then_stopped() {
        let provider = SimulatedProvider::default();
        let store = provider.store().clone();

        provider.stop_instances(&ids(&[RUNNING_ID])).await.unwrap();
        assert_eq!(store.state_of(RUNNING_ID).await, Some(InstanceState::Stopping));

        tokio::time::sleep(Duration::from_millis(2001)).await;
        assert_eq!(store.state_of(RUNNING_ID).await, Some(InstanceState::Stopped));
    }

    #[tokio::test(start_paused = true)]
    async fn opposite_actions_leave_state_but_still_report_transition() {
        let provider = SimulatedProvider::default();
        let store = provider.store().clone();

        let changes = provider.start_instances(&ids(&[RUNNING_ID])).await.unwrap();
        assert_eq!(store.state_of(RUNNING_ID).await, Some(InstanceState::Running));
        assert_eq!(
            changes,
            vec![StateChange::new(
                RUNNING_ID,
                InstanceState::Pending,
                InstanceState::Stopped
            )]
        );

        let changes = provider.stop_instances(&ids(&[STOPPED_ID])).await.unwrap();
        assert_eq!(store.state_of(STOPPED_ID).await, Some(InstanceState::Stopped));
        assert_eq!(changes[0].current_state.name, InstanceState::Stopping);
        assert_eq!(changes[0].previous_state.name, InstanceState::Running);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(store.state_of(RUNNING_ID).await, Some(InstanceState::Running));
        assert_eq!(store.state_of(STOPPED_ID).await, Some(InstanceState::Stopped));
    }

    #[tokio::test(start_paused = true)]
    async fn duplicates_and_unknown_ids_are_tolerated() {
        let provider = SimulatedProvider::default();
        let changes = provider
            .start_instances(&ids(&[STOPPED_ID, "i-missing", STOPPED_ID]))
            .await
            .unwrap();
        assert_eq!(changes.len(), 3);
        assert_eq!(changes[1].instance_id, "i-missing");
        assert_eq!(
            provider.store().state_of(STOPPED_ID).await,
            Some(InstanceState::Pending)
        );
        assert_eq!(provider.store().state_of("i-missing").await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn later_transition_supersedes_earlier_timer() {
        let store = InstanceStore::seeded();
        let delay = Duration::from_millis(2000);

        store.apply(ControlAction::Start, &ids(&[STOPPED_ID]), delay).await;
        tokio::time::sleep(Duration::from_millis(2001)).await;
        assert_eq!(store.state_of(STOPPED_ID).await, Some(InstanceState::Running));

        // stop with a long delay, then reset: the pending timer must not fire afterwards
        store
            .apply(ControlAction::Stop, &ids(&[STOPPED_ID]), Duration::from_secs(10))
            .await;
        assert_eq!(store.state_of(STOPPED_ID).await, Some(InstanceState::Stopping));
        store.reset().await;
        assert_eq!(store.state_of(STOPPED_ID).await, Some(InstanceState::Stopped));

        store.apply(ControlAction::Start, &ids(&[STOPPED_ID]), delay).await;
        tokio::time::sleep(Duration::from_secs(11)).await;
        assert_eq!(store.state_of(STOPPED_ID).await, Some(InstanceState::Running));
    }

    #[tokio::test(start_paused = true)]
    async fn stores_are_isolated() {
        let a = InstanceStore::seeded();
        let b = InstanceStore::seeded();
        a.apply(ControlAction::Start, &ids(&[STOPPED_ID]), Duration::from_secs(1))
            .await;
        assert_eq!(a.state_of(STOPPED_ID).await, Some(InstanceState::Pending));
        assert_eq!(b.state_of(STOPPED_ID).await, Some(InstanceState::Stopped));
    }

    #[tokio::test(start_paused = true)]
    async fn list_reflects_default_catalog() {
        let provider = SimulatedProvider::default();
        let list = provider.describe_instances().await.unwrap();
        assert_eq!(list.len(), 4);
        let running = list.iter().filter(|i| i.state == InstanceState::Running).count();
        let stopped = list.iter().filter(|i| i.state == InstanceState::Stopped).count();
        assert_eq!((running, stopped), (2, 2));
        let names: Vec<_> = list.iter().filter_map(|i| i.name()).collect();
        assert_eq!(
            names,
            vec![
                "テスト用Webサーバー",
                "テスト用DBサーバー",
                "テスト用アプリサーバー",
                "バッチ処理サーバー"
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn detail_status_checks_follow_state() {
        let provider = SimulatedProvider::default();

        let running = provider.describe_instance(RUNNING_ID).await.unwrap().unwrap();
        assert_eq!(running.status_checks.system_status.as_deref(), Some("ok"));
        assert_eq!(running.status_checks.instance_status.as_deref(), Some("ok"));
        assert_eq!(running.security_groups.len(), 2);

        let stopped = provider.describe_instance(STOPPED_ID).await.unwrap().unwrap();
        assert_eq!(
            stopped.status_checks,
            StatusChecks {
                system_status: Some("not-applicable".into()),
                instance_status: Some("not-applicable".into()),
            }
        );

        assert!(provider.describe_instance("nonexistent-id").await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn calls_incur_simulated_latency() {
        let provider = SimulatedProvider::default();
        let t0 = tokio::time::Instant::now();
        provider.describe_instances().await.unwrap();
        assert!(t0.elapsed() >= Duration::from_millis(500));

        let t1 = tokio::time::Instant::now();
        provider.stop_instances(&ids(&[RUNNING_ID])).await.unwrap();
        assert!(t1.elapsed() >= Duration::from_millis(800));
    }

    #[test]
    fn scaled_timing() {
        let t = SimulationTiming::default().scaled(0.5);
        assert_eq!(t.list_latency, Duration::from_millis(250));
        assert_eq!(t.transition_delay, Duration::from_millis(1000));
        assert_eq!(SimulationTiming::default().scaled(0.0).control_latency, Duration::ZERO);
    }
}
