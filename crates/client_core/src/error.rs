use reqwest::StatusCode;
use shared::error::{ErrorBody, FALLBACK_MESSAGE};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("server responded {status}: {}", .body.user_message())]
    Status { status: StatusCode, body: ErrorBody },
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("{entity} {field} is required")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },
    #[error("invalid {field}: {reason}")]
    InvalidField { field: String, reason: String },
    #[error("{action} is not available for {entity}")]
    Unsupported {
        entity: &'static str,
        action: &'static str,
    },
    #[error("invalid server url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl ClientError {
    /// Text written to the status line for this failure.
    ///
    /// Server failures surface the body's `message`; transport and decode
    /// failures have no such message and collapse onto the fallback.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Status { body, .. } => body.user_message().to_string(),
            ClientError::Transport(_) | ClientError::Decode(_) => FALLBACK_MESSAGE.to_string(),
            local => local.to_string(),
        }
    }

    /// True when the failure happened before any request left the client.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ClientError::MissingField { .. }
                | ClientError::InvalidField { .. }
                | ClientError::Unsupported { .. }
                | ClientError::InvalidBaseUrl { .. }
        )
    }

    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Transport(err) => err.status(),
            _ => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
