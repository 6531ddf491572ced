//! Request verbs of the project API.

use std::fmt;

/// Verbs the project API is called with: reads are `GET`, everything that
/// submits a form is `POST`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HttpMethod {
    /// Listing and search endpoints.
    #[default]
    Get,
    /// Login, registration, token refresh and project creation.
    Post,
}

impl HttpMethod {
    /// Whether a request with this verb may carry a JSON body.
    #[must_use]
    pub const fn has_body(self) -> bool {
        matches!(self, Self::Post)
    }

    /// Wire name of the verb.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
