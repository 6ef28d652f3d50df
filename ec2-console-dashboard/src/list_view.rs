use ec2_console_common::{ControlAction, ControlResponse, Instance, Locale, Message};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::client::{ApiFailure, DashboardApi};
use crate::config::DashboardConfig;
use crate::view::{
    lock, Generation, LoadState, LoadTicket, Notice, PendingAction, RefreshTimer, ViewError,
};

/// State of the instance list page. Pure: no I/O, no timers.
#[derive(Debug, Clone, Default)]
pub struct ListViewModel {
    load: LoadState,
    instances: Vec<Instance>,
    /// Selected IDs in the order they were picked.
    selection: Vec<String>,
    action_pending: bool,
    notice: Option<Notice>,
    generation: Generation,
}

impl ListViewModel {
    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    pub fn is_selected(&self, instance_id: &str) -> bool {
        self.selection.iter().any(|id| id == instance_id)
    }

    pub fn all_selected(&self) -> bool {
        !self.instances.is_empty() && self.instances.iter().all(|i| self.is_selected(&i.id))
    }

    pub fn action_pending(&self) -> bool {
        self.action_pending
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Text for the empty table, once a load has come back with no instances.
    pub fn placeholder(&self, locale: Locale) -> Option<String> {
        (self.load == LoadState::Loaded && self.instances.is_empty())
            .then(|| Message::NoInstances.text(locale))
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.load = LoadState::Loading;
        self.generation.next()
    }

    /// Applies a load result. Returns `false` when the ticket is stale and nothing changed.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Instance>, ApiFailure>,
        locale: Locale,
    ) -> bool {
        if !self.generation.is_current(ticket) {
            return false;
        }
        match result {
            Ok(instances) => {
                self.selection
                    .retain(|id| instances.iter().any(|i| &i.id == id));
                self.instances = instances;
                self.load = LoadState::Loaded;
            }
            Err(failure) => {
                tracing::warn!("instance list load failed: {}", failure);
                self.load = LoadState::Error(Message::ListLoadError.text(locale));
            }
        }
        true
    }

    /// Makes every outstanding ticket stale.
    pub fn invalidate(&mut self) {
        self.generation.next();
        if self.load.is_loading() {
            self.load = if self.instances.is_empty() {
                LoadState::Idle
            } else {
                LoadState::Loaded
            };
        }
    }

    pub fn toggle(&mut self, instance_id: &str) {
        if let Some(pos) = self.selection.iter().position(|id| id == instance_id) {
            self.selection.remove(pos);
        } else if self.instances.iter().any(|i| i.id == instance_id) {
            self.selection.push(instance_id.to_string());
        }
    }

    pub fn select_all(&mut self) {
        self.selection = self.instances.iter().map(|i| i.id.clone()).collect();
    }

    pub fn select_none(&mut self) {
        self.selection.clear();
    }

    /// Header checkbox: everything when anything is unselected, otherwise nothing.
    pub fn toggle_all(&mut self) {
        if self.all_selected() {
            self.select_none();
        } else {
            self.select_all();
        }
    }

    pub fn begin_action(
        &mut self,
        action: ControlAction,
        locale: Locale,
    ) -> Result<PendingAction, ViewError> {
        if self.action_pending {
            return Err(ViewError::ActionInFlight);
        }
        if self.selection.is_empty() {
            self.notice = Some(Notice::Error(ViewError::EmptySelection.message(locale)));
            return Err(ViewError::EmptySelection);
        }
        self.action_pending = true;
        self.notice = None;
        Ok(PendingAction {
            action,
            instance_ids: self.selection.clone(),
        })
    }

    /// Records the relay's answer. Returns `true` when a follow-up refresh is due.
    pub fn finish_action(&mut self, result: Result<ControlResponse, ApiFailure>) -> bool {
        self.action_pending = false;
        match result {
            Ok(response) => {
                self.notice = Some(Notice::Confirmation(response.message));
                self.selection.clear();
                true
            }
            Err(failure) => {
                self.notice = Some(Notice::Error(failure.message));
                false
            }
        }
    }
}

struct ListViewInner {
    api: Arc<dyn DashboardApi>,
    locale: Locale,
    refresh_delay: Duration,
    model: Mutex<ListViewModel>,
    refresh: RefreshTimer,
    /// Cleared only by `unmount`; a view is live from construction.
    mounted: AtomicBool,
}

/// Controller for the instance list page. Clones share the same view.
#[derive(Clone)]
pub struct ListView {
    inner: Arc<ListViewInner>,
}

impl ListView {
    pub fn new(api: Arc<dyn DashboardApi>, config: &DashboardConfig) -> Self {
        Self {
            inner: Arc::new(ListViewInner {
                api,
                locale: config.locale,
                refresh_delay: config.refresh_delay,
                model: Mutex::new(ListViewModel::default()),
                refresh: RefreshTimer::default(),
                mounted: AtomicBool::new(true),
            }),
        }
    }

    pub fn snapshot(&self) -> ListViewModel {
        lock(&self.inner.model).clone()
    }

    pub fn locale(&self) -> Locale {
        self.inner.locale
    }

    pub async fn mount(&self) {
        self.inner.mounted.store(true, Ordering::SeqCst);
        self.refresh().await;
    }

    /// Stops the scheduled refresh and drops results of loads still in flight.
    pub fn unmount(&self) {
        self.inner.mounted.store(false, Ordering::SeqCst);
        self.inner.refresh.cancel();
        lock(&self.inner.model).invalidate();
    }

    pub async fn refresh(&self) {
        let ticket = lock(&self.inner.model).begin_load();
        let result = self.inner.api.list_instances().await;
        let applied = lock(&self.inner.model).finish_load(ticket, result, self.inner.locale);
        if !applied {
            tracing::debug!("discarded stale instance list");
        }
    }

    pub fn toggle(&self, instance_id: &str) {
        lock(&self.inner.model).toggle(instance_id);
    }

    pub fn select_all(&self) {
        lock(&self.inner.model).select_all();
    }

    pub fn select_none(&self) {
        lock(&self.inner.model).select_none();
    }

    pub fn toggle_all(&self) {
        lock(&self.inner.model).toggle_all();
    }

    /// Sends `action` for the current selection.
    ///
    /// `Err` only for local rejections; a relay failure ends up in the model's notice.
    pub async fn submit(&self, action: ControlAction) -> Result<(), ViewError> {
        let pending = lock(&self.inner.model).begin_action(action, self.inner.locale)?;
        tracing::info!(
            "submitting {} for {} instance(s)",
            pending.action,
            pending.instance_ids.len()
        );
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
                // detached so a later reschedule cannot abort a request already sent
                tokio::spawn(async move { ListView { inner }.refresh().await });
            }
        });
    }
}
