//! HTTP client port

use std::future::Future;
use std::pin::Pin;

use projecthub_domain::{ApiRequest, ApiResponse};
use thiserror::Error;

/// Boxed future returned by [`HttpClient::execute`].
pub type HttpFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ApiResponse, HttpClientError>> + Send + 'a>>;

/// Port for sending one HTTP request to the project API.
///
/// Implementations resolve `request.path` against their base URL, write
/// `request.bearer` as an `Authorization: Bearer` header when present and
/// return every status code as a response; only failures to obtain a
/// response at all are errors.
pub trait HttpClient: Send + Sync {
    /// Sends the request and returns the raw response.
    fn execute(&self, request: &ApiRequest) -> HttpFuture<'_>;
}

/// Failures to obtain any response from the server.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HttpClientError {
    /// No response within the configured timeout.
    #[error("request timed out after {timeout_ms} ms")]
    Timeout {
        /// Timeout that elapsed.
        timeout_ms: u64,
    },

    /// The host name could not be resolved.
    #[error("could not resolve {host}: {message}")]
    DnsError {
        /// Host that failed to resolve.
        host: String,
        /// Resolver message.
        message: String,
    },

    /// The server refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// Any other connection failure.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The request URL could not be built.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request could not be encoded.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Anything else.
    #[error("{0}")]
    Other(String),
}
