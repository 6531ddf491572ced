//! Outbound API request description.

use secrecy::SecretString;
use serde_json::Value;

use super::HttpMethod;

/// Whether a request takes part in credential handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Access {
    /// The cached access token is attached and a 401 triggers one
    /// refresh-and-replay.
    #[default]
    Authenticated,
    /// No bearer header; a 401 is reported as an ordinary API error.
    Anonymous,
}

/// A request against the project API, relative to the configured base URL.
///
/// The bearer token is kept out of the header list so it stays wrapped
/// until the HTTP adapter writes it on the wire.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Path below the base URL, e.g. `/api/projects/owned/`.
    pub path: String,
    /// Query parameters in the order they should be encoded.
    pub query: Vec<(String, String)>,
    /// Optional JSON body.
    pub body: Option<Value>,
    /// Bearer credential to present, set by the transport.
    pub bearer: Option<SecretString>,
    /// Credential handling mode.
    pub access: Access,
}

impl ApiRequest {
    /// Creates an authenticated request without query or body.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            bearer: None,
            access: Access::Authenticated,
        }
    }

    /// Shorthand for a `GET` request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Shorthand for a `POST` request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Sets the JSON body.
    #[must_use]
    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Marks the request as anonymous.
    #[must_use]
    pub const fn anonymous(mut self) -> Self {
        self.access = Access::Anonymous;
        self
    }

    /// Returns a copy carrying the given bearer token (or none).
    #[must_use]
    pub fn presenting(&self, bearer: Option<SecretString>) -> Self {
        Self {
            bearer,
            ..self.clone()
        }
    }

    /// Returns true if the request bypasses credential handling.
    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        matches!(self.access, Access::Anonymous)
    }

    /// Returns the value of a query parameter, if present.
    #[must_use]
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}
