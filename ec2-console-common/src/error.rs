use thiserror::Error;

use crate::i18n::{Locale, Message};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidRequestReason {
    /// Missing action, missing / empty / non-list instance IDs, or an unreadable body.
    InvalidParameters,
    UnknownAction(String),
    MissingInstanceId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryOperation {
    List,
    Detail,
}

/// Failure taxonomy shared by the relay, the directory and the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsoleError {
    #[error("invalid request: {0:?}")]
    InvalidRequest(InvalidRequestReason),
    #[error("instance not found: {0}")]
    InstanceNotFound(String),
    #[error("instance directory unavailable ({0:?})")]
    DirectoryUnavailable(DirectoryOperation),
    #[error("instance control failed")]
    ControlFailed,
}

impl ConsoleError {
    pub fn category(&self) -> &'static str {
        match self {
            ConsoleError::InvalidRequest(_) => "invalid_request",
            ConsoleError::InstanceNotFound(_) => "instance_not_found",
            ConsoleError::DirectoryUnavailable(_) => "directory_unavailable",
            ConsoleError::ControlFailed => "control_failed",
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ConsoleError::InvalidRequest(_) => 400,
            ConsoleError::InstanceNotFound(_) => 404,
            ConsoleError::DirectoryUnavailable(_) | ConsoleError::ControlFailed => 500,
        }
    }

    /// User-facing text. Provider details never leak into it.
    pub fn message(&self, locale: Locale) -> String {
        match self {
            ConsoleError::InvalidRequest(InvalidRequestReason::InvalidParameters) => {
                Message::InvalidParameters.text(locale)
            }
            ConsoleError::InvalidRequest(InvalidRequestReason::UnknownAction(action)) => {
                Message::UnknownAction(action.clone()).text(locale)
            }
            ConsoleError::InvalidRequest(InvalidRequestReason::MissingInstanceId) => {
                Message::MissingInstanceId.text(locale)
            }
            ConsoleError::InstanceNotFound(_) => Message::InstanceNotFound.text(locale),
            ConsoleError::DirectoryUnavailable(DirectoryOperation::List) => {
                Message::ListFailed.text(locale)
            }
            ConsoleError::DirectoryUnavailable(DirectoryOperation::Detail) => {
                Message::DetailFailed.text(locale)
            }
            ConsoleError::ControlFailed => Message::ControlFailed.text(locale),
        }
    }
}
