//! Server error bodies.
//!
//! The API reports failures in a few shapes: per-field validation lists
//! (`{"email": ["Email already registered"]}`), a `non_field_errors` list,
//! a `detail` string, or an `error` string.

use std::collections::BTreeMap;

use serde_json::Value;

const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Parsed error body of a non-2xx response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorPayload {
    /// Validation messages keyed by field name.
    pub field_errors: BTreeMap<String, Vec<String>>,
    /// Validation messages not tied to a field.
    pub non_field_errors: Vec<String>,
    /// Generic `detail` message.
    pub detail: Option<String>,
    /// Generic `error` message.
    pub error: Option<String>,
}

impl ErrorPayload {
    /// Parses an error body. Non-JSON or non-object bodies yield an empty
    /// payload.
    #[must_use]
    pub fn parse(body: &[u8]) -> Self {
        let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(body) else {
            return Self::default();
        };

        let mut payload = Self::default();
        for (key, value) in map {
            if key == "detail" {
                payload.detail = value.as_str().map(str::to_string);
            } else if key == "error" {
                payload.error = value.as_str().map(str::to_string);
            } else if key == NON_FIELD_ERRORS {
                payload.non_field_errors = messages(&value);
            } else if value.is_array() {
                let list = messages(&value);
                if !list.is_empty() {
                    payload.field_errors.insert(key, list);
                }
            }
        }
        payload
    }

    /// The message to show the user: first field error, then first
    /// non-field error, then `detail`, then `error`.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        self.field_errors
            .values()
            .find_map(|list| list.first().cloned())
            .or_else(|| self.non_field_errors.first().cloned())
            .or_else(|| self.detail.clone())
            .or_else(|| self.error.clone())
    }

    /// Returns true if nothing usable was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.field_errors.is_empty()
            && self.non_field_errors.is_empty()
            && self.detail.is_none()
            && self.error.is_none()
    }
}

fn messages(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn parse(value: &Value) -> ErrorPayload {
        ErrorPayload::parse(value.to_string().as_bytes())
    }

    #[test]
    fn test_field_error_wins() {
        let payload = parse(&json!({
            "email": ["Email already registered"],
            "non_field_errors": ["Passwords do not match"],
            "detail": "Bad request"
        }));

        assert_eq!(payload.message().as_deref(), Some("Email already registered"));
        assert_eq!(payload.field_errors.len(), 1);
    }

    #[test]
    fn test_non_field_error_before_detail() {
        let payload = parse(&json!({
            "non_field_errors": ["Invalid credentials"],
            "detail": "Bad request"
        }));
        assert_eq!(payload.message().as_deref(), Some("Invalid credentials"));
    }

    #[test]
    fn test_detail_then_error() {
        assert_eq!(
            parse(&json!({"detail": "Access denied"})).message().as_deref(),
            Some("Access denied")
        );
        assert_eq!(
            parse(&json!({"error": "At least one admin required"}))
                .message()
                .as_deref(),
            Some("At least one admin required")
        );
    }

    #[test]
    fn test_plain_strings_are_not_field_errors() {
        let payload = parse(&json!({"message": "Login failed"}));
        assert!(payload.is_empty());
        assert_eq!(payload.message(), None);
    }

    #[test]
    fn test_non_json_body() {
        let payload = ErrorPayload::parse(b"<html>502</html>");
        assert!(payload.is_empty());
    }
}
