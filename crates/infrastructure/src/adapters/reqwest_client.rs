//! HTTP Client implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port using the reqwest library.
//! Request paths are resolved against the configured API base URL.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use projecthub_application::ports::{HttpClient, HttpClientError, HttpFuture};
use projecthub_domain::{ApiRequest, ApiResponse, HttpMethod};
use reqwest::{Client, Method, Url};
use secrecy::ExposeSecret;
use tracing::trace;

use crate::settings::ApiSettings;

/// HTTP client implementation using reqwest.
///
/// Wraps `reqwest::Client` together with the API base URL and the
/// per-request timeout.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl ReqwestHttpClient {
    /// Creates a client for the API described by `settings`.
    ///
    /// Default configuration:
    /// - Follow redirects: up to 10
    /// - TLS verification: enabled
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the client cannot be
    /// created.
    pub fn new(settings: &ApiSettings) -> Result<Self, HttpClientError> {
        let base_url = settings
            .base_url()
            .map_err(|e| HttpClientError::InvalidUrl(e.to_string()))?;
        let client = Client::builder()
            .user_agent(&settings.user_agent)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| HttpClientError::Other(e.to_string()))?;

        Ok(Self::with_client(client, base_url, settings.timeout()))
    }

    /// Creates a client from a preconfigured reqwest client.
    #[must_use]
    pub fn with_client(client: Client, base_url: Url, timeout: Duration) -> Self {
        Self {
            client,
            base_url: normalize_base(base_url),
            timeout,
        }
    }

    /// The base URL request paths are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
        }
    }

    /// Resolves the request path and encodes its query parameters.
    fn resolve_url(&self, request: &ApiRequest) -> Result<Url, HttpClientError> {
        let mut url = self
            .base_url
            .join(request.path.trim_start_matches('/'))
            .map_err(|e| HttpClientError::InvalidUrl(format!("{e}: {}", request.path)))?;

        if !request.query.is_empty() {
            let encoded = serde_urlencoded::to_string(&request.query)
                .map_err(|e| HttpClientError::InvalidRequest(e.to_string()))?;
            url.set_query(Some(&encoded));
        }
        Ok(url)
    }

    /// Maps reqwest errors to `HttpClientError`.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> HttpClientError {
        if error.is_timeout() {
            return HttpClientError::Timeout { timeout_ms };
        }

        let host = || {
            error
                .url()
                .and_then(Url::host_str)
                .unwrap_or("unknown")
                .to_string()
        };

        if error.is_connect() {
            let message = error.to_string();
            let lowered = message.to_lowercase();
            if lowered.contains("dns") || lowered.contains("resolve") {
                return HttpClientError::DnsError {
                    host: host(),
                    message,
                };
            }
            if lowered.contains("refused") {
                return HttpClientError::ConnectionRefused {
                    host: host(),
                    port: error
                        .url()
                        .and_then(Url::port_or_known_default)
                        .unwrap_or(80),
                };
            }
            return HttpClientError::ConnectionFailed(message);
        }

        HttpClientError::Other(error.to_string())
    }
}

/// Makes sure the base URL ends with `/` so `join` keeps its last segment.
fn normalize_base(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

impl HttpClient for ReqwestHttpClient {
    fn execute(&self, request: &ApiRequest) -> HttpFuture<'_> {
        let method = request.method;
        let url = self.resolve_url(request);
        let body = request.body.clone();
        let bearer = request.bearer.clone();
        let timeout = self.timeout;
        let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);

        Box::pin(async move {
            let url = url?;
            trace!(%method, %url, "sending request");
            let start = Instant::now();

            let mut builder = self
                .client
                .request(Self::to_reqwest_method(method), url)
                .timeout(timeout);
            if let Some(token) = &bearer {
                builder = builder.bearer_auth(token.expose_secret());
            }
            if let Some(body) = &body {
                if !method.has_body() {
                    return Err(HttpClientError::InvalidRequest(format!(
                        "{method} requests cannot carry a body"
                    )));
                }
                builder = builder.json(body);
            }

            let response = builder
                .send()
                .await
                .map_err(|e| Self::map_error(&e, timeout_ms))?;

            let status = response.status().as_u16();
            let headers: HashMap<String, String> = response
                .headers()
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
                .collect();

            let body_bytes = response
                .bytes()
                .await
                .map_err(|e| Self::map_error(&e, timeout_ms))?
                .to_vec();

            Ok(ApiResponse::new(
                status,
                headers,
                body_bytes,
                start.elapsed(),
            ))
        })
    }
}
