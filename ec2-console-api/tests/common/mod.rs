// Common test utilities and fixtures
#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use ec2_console_api::app::AppState;
use ec2_console_api::routes::create_app;
use ec2_console_common::{Instance, InstanceDetail, Locale, StateChange};
use ec2_console_providers::mock::{InstanceStore, SimulatedProvider, SimulationTiming};
use ec2_console_providers::InstanceProvider;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const WEB: &str = "i-1234567890abcdef0";
pub const DB: &str = "i-0987654321fedcba0";
pub const APP: &str = "i-abcdef1234567890";
pub const BATCH: &str = "i-fedcba0987654321";

/// Router over a fresh simulated catalog, plus a handle on its store.
/// Timing is the real one, so tests run with a paused clock.
pub fn create_test_app_service() -> (Router, InstanceStore) {
    create_test_app_with_locale(Locale::EnUs)
}

pub fn create_test_app_with_locale(locale: Locale) -> (Router, InstanceStore) {
    let store = InstanceStore::seeded();
    let provider = SimulatedProvider::new(store.clone(), SimulationTiming::default());
    let state = AppState::new(Arc::new(provider), locale);
    (create_app(state), store)
}

/// Router over a provider that fails every call and counts them.
pub fn create_failing_app() -> (Router, Arc<FailingProvider>) {
    let provider = Arc::new(FailingProvider::default());
    let state = AppState::new(provider.clone(), Locale::EnUs);
    (create_app(state), provider)
}

#[derive(Default)]
pub struct FailingProvider {
    pub calls: AtomicUsize,
}

impl FailingProvider {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail<T>(&self) -> anyhow::Result<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(anyhow::anyhow!("UnauthorizedOperation: credentials rejected"))
    }
}

#[async_trait]
impl InstanceProvider for FailingProvider {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn describe_instances(&self) -> anyhow::Result<Vec<Instance>> {
        self.fail()
    }

    async fn describe_instance(
        &self,
        _instance_id: &str,
    ) -> anyhow::Result<Option<InstanceDetail>> {
        self.fail()
    }

    async fn start_instances(&self, _instance_ids: &[String]) -> anyhow::Result<Vec<StateChange>> {
        self.fail()
    }

    async fn stop_instances(&self, _instance_ids: &[String]) -> anyhow::Result<Vec<StateChange>> {
        self.fail()
    }
}
