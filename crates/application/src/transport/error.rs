//! Transport errors.

use std::collections::BTreeMap;

use projecthub_domain::{ApiResponse, ErrorPayload, StatusCode};
use thiserror::Error;

use crate::ports::HttpClientError;

/// Errors surfaced by [`AuthenticatedTransport`](super::AuthenticatedTransport).
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// No response could be obtained.
    #[error("network error: {0}")]
    Network(#[from] HttpClientError),

    /// The server answered with a non-2xx status.
    #[error("{message} ({status})")]
    Api {
        /// Response status.
        status: StatusCode,
        /// Message to show the user.
        message: String,
        /// Parsed error body.
        payload: ErrorPayload,
    },

    /// A 2xx body did not have the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),

    /// Credentials could not be renewed; the session has been cleared and
    /// [`AppEvent::SessionExpired`](crate::AppEvent::SessionExpired)
    /// published. Callers should not report this again.
    #[error("session expired, please sign in again")]
    SessionExpired,
}

impl TransportError {
    /// Builds an [`TransportError::Api`] from a failed response.
    #[must_use]
    pub fn from_response(response: &ApiResponse) -> Self {
        let payload = ErrorPayload::parse(&response.body);
        let message = payload
            .message()
            .unwrap_or_else(|| response.status.reason_phrase().to_string());
        Self::Api {
            status: response.status,
            message,
            payload,
        }
    }

    /// Returns true if the session was torn down by this failure.
    #[must_use]
    pub const fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }

    /// Response status, for API errors.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Per-field validation messages, for API errors.
    #[must_use]
    pub fn field_errors(&self) -> Option<&BTreeMap<String, Vec<String>>> {
        match self {
            Self::Api { payload, .. } if !payload.field_errors.is_empty() => {
                Some(&payload.field_errors)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_message_from_field_errors() {
        let response = ApiResponse::json(400, &json!({"email": ["Email already registered"]}));
        let error = TransportError::from_response(&response);

        assert_eq!(error.to_string(), "Email already registered (400 Bad Request)");
        assert_eq!(error.status(), Some(StatusCode::new(400)));
        assert!(error.field_errors().is_some_and(|f| f.contains_key("email")));
    }

    #[test]
    fn test_message_falls_back_to_reason() {
        let response = ApiResponse::new(
            502,
            Default::default(),
            b"<html>".to_vec(),
            Default::default(),
        );
        let error = TransportError::from_response(&response);

        assert_eq!(error.to_string(), "Bad Gateway (502 Bad Gateway)");
        assert!(error.field_errors().is_none());
    }
}
