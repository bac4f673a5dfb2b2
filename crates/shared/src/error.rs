use serde::{Deserialize, Serialize};

/// Shown whenever a failure carries no server-provided message.
pub const FALLBACK_MESSAGE: &str = "Server error!";

/// Structured body the server attaches to non-2xx responses.
///
/// Every field is optional: a body without `message` still parses and the
/// caller falls back to [`FALLBACK_MESSAGE`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorBody {
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Lenient parse: anything that is not a JSON object with the expected
    /// shape yields an empty body rather than an error.
    pub fn parse_lenient(raw: &[u8]) -> Self {
        serde_json::from_slice(raw).unwrap_or_default()
    }

    pub fn user_message(&self) -> &str {
        self.message
            .as_deref()
            .filter(|message| !message.trim().is_empty())
            .unwrap_or(FALLBACK_MESSAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_is_extracted_when_present() {
        let body = ErrorBody::parse_lenient(br#"{"status":404,"error":"Not Found","message":"Order 99 not found"}"#);
        assert_eq!(body.user_message(), "Order 99 not found");
        assert_eq!(body.status, Some(404));
    }

    #[test]
    fn missing_or_garbled_bodies_fall_back() {
        assert_eq!(ErrorBody::parse_lenient(b"").user_message(), FALLBACK_MESSAGE);
        assert_eq!(ErrorBody::parse_lenient(b"<html>").user_message(), FALLBACK_MESSAGE);
        assert_eq!(
            ErrorBody::parse_lenient(br#"{"error":"Bad"}"#).user_message(),
            FALLBACK_MESSAGE
        );
        assert_eq!(
            ErrorBody::parse_lenient(br#"{"message":123}"#).user_message(),
            FALLBACK_MESSAGE
        );
    }
}
