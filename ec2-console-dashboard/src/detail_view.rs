use ec2_console_common::{ControlAction, ControlResponse, InstanceDetail, Locale, Message};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::client::{ApiFailure, DashboardApi};
use crate::config::DashboardConfig;
use crate::view::{
    lock, Generation, LoadState, LoadTicket, Notice, PendingAction, RefreshTimer, ViewError,
};

/// State of the detail page for one instance.
#[derive(Debug, Clone)]
pub struct DetailViewModel {
    instance_id: String,
    load: LoadState,
    instance: Option<InstanceDetail>,
    action_pending: bool,
    notice: Option<Notice>,
    generation: Generation,
}

impl DetailViewModel {
    pub fn new(instance_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            load: LoadState::Idle,
            instance: None,
            action_pending: false,
            notice: None,
            generation: Generation::default(),
        }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn instance(&self) -> Option<&InstanceDetail> {
        self.instance.as_ref()
    }

    pub fn action_pending(&self) -> bool {
        self.action_pending
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// The action the page offers for the displayed state, if any.
    pub fn available_action(&self) -> Option<ControlAction> {
        if self.action_pending {
            return None;
        }
        self.instance.as_ref().and_then(|i| i.state().valid_action())
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.load = LoadState::Loading;
        self.generation.next()
    }

    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<InstanceDetail, ApiFailure>,
        locale: Locale,
    ) -> bool {
        if !self.generation.is_current(ticket) {
            return false;
        }
        match result {
            Ok(instance) => {
                self.instance = Some(instance);
                self.load = LoadState::Loaded;
            }
            Err(failure) => {
                tracing::warn!("instance {} load failed: {}", self.instance_id, failure);
                self.load = LoadState::Error(Message::DetailLoadError.text(locale));
            }
        }
        true
    }

    pub fn invalidate(&mut self) {
        self.generation.next();
        if self.load.is_loading() {
            self.load = if self.instance.is_some() {
                LoadState::Loaded
            } else {
                LoadState::Idle
            };
        }
    }

    /// Targets the displayed instance; only the in-flight guard applies.
    pub fn begin_action(&mut self, action: ControlAction) -> Result<PendingAction, ViewError> {
        if self.action_pending {
            return Err(ViewError::ActionInFlight);
        }
        self.action_pending = true;
        self.notice = None;
        Ok(PendingAction {
            action,
            instance_ids: vec![self.instance_id.clone()],
        })
    }

    pub fn finish_action(&mut self, result: Result<ControlResponse, ApiFailure>) -> bool {
        self.action_pending = false;
        match result {
            Ok(response) => {
                self.notice = Some(Notice::Confirmation(response.message));
                true
            }
            Err(failure) => {
                self.notice = Some(Notice::Error(failure.message));
                false
            }
        }
    }
}

struct DetailViewInner {
    api: Arc<dyn DashboardApi>,
    locale: Locale,
    refresh_delay: Duration,
    model: Mutex<DetailViewModel>,
    refresh: RefreshTimer,
    /// Cleared only by `unmount`; a view is live from construction.
    mounted: AtomicBool,
}

/// Controller for the detail page of a single instance.
#[derive(Clone)]
pub struct DetailView {
    inner: Arc<DetailViewInner>,
}

impl DetailView {
    pub fn new(
        api: Arc<dyn DashboardApi>,
        config: &DashboardConfig,
        instance_id: impl Into<String>,
    ) -> Self {
        Self {
            inner: Arc::new(DetailViewInner {
                api,
                locale: config.locale,
                refresh_delay: config.refresh_delay,
                model: Mutex::new(DetailViewModel::new(instance_id)),
                refresh: RefreshTimer::default(),
                mounted: AtomicBool::new(true),
            }),
        }
    }

    pub fn snapshot(&self) -> DetailViewModel {
        lock(&self.inner.model).clone()
    }

    pub async fn mount(&self) {
        self.inner.mounted.store(true, Ordering::SeqCst);
        self.refresh().await;
    }

    pub fn unmount(&self) {
        self.inner.mounted.store(false, Ordering::SeqCst);
        self.inner.refresh.cancel();
        lock(&self.inner.model).invalidate();
    }

    pub async fn refresh(&self) {
        let (ticket, instance_id) = {
            let mut model = lock(&self.inner.model);
            (model.begin_load(), model.instance_id().to_string())
        };
        let result = self.inner.api.get_instance(&instance_id).await;
        if !lock(&self.inner.model).finish_load(ticket, result, self.inner.locale) {
            tracing::debug!("discarded stale detail for {}", instance_id);
        }
    }

    pub async fn submit(&self, action: ControlAction) -> Result<(), ViewError> {
        let pending = lock(&self.inner.model).begin_action(action)?;
        tracing::info!("submitting {} for {}", pending.action, pending.instance_ids[0]);
        let result = self
            .inner
            .api
            .control(pending.action, &pending.instance_ids)
            .await;
        let refresh_due = lock(&self.inner.model).finish_action(result);
        if refresh_due && self.inner.mounted.load(Ordering::SeqCst) {
            self.schedule_refresh();
        }
        Ok(())
    }

    pub fn has_scheduled_refresh(&self) -> bool {
        self.inner.refresh.is_pending()
    }

    fn schedule_refresh(&self) {
        let view = Arc::downgrade(&self.inner);
        let delay = self.inner.refresh_delay;
        self.inner.refresh.schedule(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = view.upgrade() {
                tokio::spawn(async move { DetailView { inner }.refresh().await });
            }
        });
    }
}
