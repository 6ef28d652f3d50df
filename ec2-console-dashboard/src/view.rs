// Pieces shared by the list and detail controllers.

use ec2_console_common::{ControlAction, Locale, Message};
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    /// Localized message; previously loaded data stays visible.
    Error(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Identifies one load request. Only the ticket from the latest `begin_load` is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug, Clone, Default)]
pub(crate) struct Generation(u64);

impl Generation {
    pub(crate) fn next(&mut self) -> LoadTicket {
        self.0 += 1;
        LoadTicket(self.0)
    }

    pub(crate) fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.0
    }
}

/// Outcome of the last control action, as shown above the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Confirmation(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Confirmation(text) | Notice::Error(text) => text,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

/// Submissions refused locally, before the relay is contacted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    #[error("no instance selected")]
    EmptySelection,
    #[error("a control action is already in flight")]
    ActionInFlight,
}

impl ViewError {
    pub fn message(&self, locale: Locale) -> String {
        match self {
            ViewError::EmptySelection => Message::SelectInstances.text(locale),
            ViewError::ActionInFlight => Message::ActionInFlight.text(locale),
        }
    }
}

/// A control action accepted by a view model and waiting to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAction {
    pub action: ControlAction,
    pub instance_ids: Vec<String>,
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// At most one deferred refresh per view.
#[derive(Default)]
pub(crate) struct RefreshTimer {
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl RefreshTimer {
    /// Replaces any refresh still waiting.
    pub(crate) fn schedule<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut slot = lock(&self.handle);
        if let Some(previous) = slot.take() {
            previous.abort();
        }
        *slot = Some(tokio::spawn(task));
    }

    pub(crate) fn cancel(&self) {
        if let Some(handle) = lock(&self.handle).take() {
            handle.abort();
        }
    }

    pub(crate) fn is_pending(&self) -> bool {
        lock(&self.handle)
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
