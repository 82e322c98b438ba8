use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure classes a client surfaces to its user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The request never reached the service, or the transport failed.
    Connectivity,
    /// The service answered with a non-success status.
    Service,
    /// Rejected locally before any network activity.
    Validation,
    /// Best-effort clipboard write failed. Never shown to the user.
    Clipboard,
}

impl ErrorKind {
    pub fn is_user_visible(self) -> bool {
        !matches!(self, ErrorKind::Clipboard)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct ApiException {
    pub kind: ErrorKind,
    pub message: String,
}

impl ApiException {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<ApiException> for ApiError {
    fn from(value: ApiException) -> Self {
        Self {
            kind: value.kind,
            message: value.message,
        }
    }
}

impl From<ApiError> for ApiException {
    fn from(value: ApiError) -> Self {
        Self {
            kind: value.kind,
            message: value.message,
        }
    }
}

#[cfg(test)]
#[path = "tests/error_tests.rs"]
mod tests;
