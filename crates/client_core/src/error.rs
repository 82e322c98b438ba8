use reqwest::StatusCode;
use shared::error::{ApiError, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid API base address '{address}': {source}")]
    InvalidBaseAddress {
        address: String,
        #[source]
        source: url::ParseError,
    },
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("service responded with HTTP {status}")]
    Status {
        status: StatusCode,
        reason: Option<String>,
    },
    #[error("malformed response body: {0}")]
    Decode(String),
    #[error("{0}")]
    Validation(String),
    #[error("unknown transform function '{0}'")]
    UnknownFunction(String),
    #[error("clipboard write failed: {0}")]
    Clipboard(String),
}

impl ClientError {
    /// Failure reason reported by the service in its error envelope, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            ClientError::Status { reason, .. } => reason.as_deref(),
            _ => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::InvalidBaseAddress { .. } | ClientError::Transport(_) => {
                ErrorKind::Connectivity
            }
            ClientError::Status { .. } | ClientError::Decode(_) => ErrorKind::Service,
            ClientError::Validation(_) | ClientError::UnknownFunction(_) => ErrorKind::Validation,
            ClientError::Clipboard(_) => ErrorKind::Clipboard,
        }
    }
}

impl From<&ClientError> for ApiError {
    fn from(value: &ClientError) -> Self {
        let message = value
            .reason()
            .map(str::to_owned)
            .unwrap_or_else(|| value.to_string());
        ApiError::new(value.kind(), message)
    }
}

#[cfg(test)]
#[path = "tests/error_tests.rs"]
mod tests;
