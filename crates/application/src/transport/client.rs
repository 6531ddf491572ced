//! Credential-aware request path to the project API.

use std::sync::Arc;

use projecthub_domain::{
    ApiRequest, ApiResponse, HttpMethod, RefreshedAccess, generate_request_id,
};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tracing::{Instrument, debug, debug_span, info, warn};

use super::busy::BusyTracker;
use super::error::TransportError;
use crate::events::{AppEvent, EventBus};
use crate::ports::{HttpClient, SessionStore};

/// Endpoint exchanging a refresh token for a new access token.
pub const REFRESH_PATH: &str = "/api/auth/token/refresh/";

/// Sends API requests with the cached access token and renews it once on
/// a 401.
///
/// Concurrent requests that fail with 401 share one refresh exchange: the
/// first to take the refresh lock performs it and the others reuse the
/// token it stored. When renewal is impossible, or a replayed request is
/// rejected again, the session is cleared and
/// [`AppEvent::SessionExpired`] is published.
pub struct AuthenticatedTransport {
    http: Arc<dyn HttpClient>,
    session: Arc<dyn SessionStore>,
    events: EventBus,
    busy: BusyTracker,
    refresh_lock: Mutex<()>,
}

impl AuthenticatedTransport {
    /// Creates a transport over the given client and session.
    #[must_use]
    pub fn new(
        http: Arc<dyn HttpClient>,
        session: Arc<dyn SessionStore>,
        events: EventBus,
    ) -> Self {
        Self {
            http,
            session,
            events,
            busy: BusyTracker::new(),
            refresh_lock: Mutex::new(()),
        }
    }

    /// The session whose credentials this transport presents.
    #[must_use]
    pub fn session(&self) -> &dyn SessionStore {
        self.session.as_ref()
    }

    /// The bus session-expiry is published on.
    #[must_use]
    pub const fn events(&self) -> &EventBus {
        &self.events
    }

    /// The in-flight counter raised by every request.
    #[must_use]
    pub const fn busy(&self) -> &BusyTracker {
        &self.busy
    }

    /// Builds and sends an authenticated request.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedTransport::execute`].
    pub async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        params: &[(&str, &str)],
        body: Option<Value>,
    ) -> Result<ApiResponse, TransportError> {
        let mut request = ApiRequest::new(method, path);
        for (key, value) in params {
            request = request.with_query(*key, *value);
        }
        if let Some(body) = body {
            request = request.with_json(body);
        }
        self.execute(request).await
    }

    /// Sends a request and returns its 2xx response.
    ///
    /// # Errors
    ///
    /// - `Network` when no response was obtained
    /// - `Api` for non-2xx responses other than a recoverable 401
    /// - `SessionExpired` once the session has been torn down
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let _in_flight = self.busy.begin();
        let span = debug_span!(
            "api_request",
            request_id = %generate_request_id(),
            method = %request.method,
            path = %request.path,
        );
        self.execute_inner(request).instrument(span).await
    }

    /// Sends a request and decodes its 2xx JSON body.
    ///
    /// # Errors
    ///
    /// As [`AuthenticatedTransport::execute`], plus `Decode` when the body
    /// does not match `T`.
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<T, TransportError> {
        let response = self.execute(request).await?;
        response
            .decode()
            .map_err(|e| TransportError::Decode(e.to_string()))
    }

    async fn execute_inner(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        if request.is_anonymous() {
            let response = self.dispatch(&request, None).await?;
            return accept(response);
        }

        let presented = self.session.access_token();
        let response = self.dispatch(&request, presented.clone()).await?;
        if !response.is_unauthorized() {
            return accept(response);
        }

        debug!("access token rejected, renewing");
        let renewed = self.renew_access(presented.as_ref()).await?;
        let replayed = self.dispatch(&request, Some(renewed)).await?;
        if replayed.is_unauthorized() {
            return Err(self.expire_session("renewed token was rejected"));
        }
        accept(replayed)
    }

    async fn dispatch(
        &self,
        request: &ApiRequest,
        bearer: Option<SecretString>,
    ) -> Result<ApiResponse, TransportError> {
        let outgoing = request.presenting(bearer);
        let response = self.http.execute(&outgoing).await.map_err(|e| {
            warn!(error = %e, "request failed");
            e
        })?;
        debug!(
            status = response.status.as_u16(),
            elapsed = %response.duration_display(),
            "response received"
        );
        Ok(response)
    }

    async fn renew_access(
        &self,
        rejected: Option<&SecretString>,
    ) -> Result<SecretString, TransportError> {
        let _flight = self.refresh_lock.lock().await;

        match self.session.access_token() {
            Some(current) if !same_secret(rejected, &current) => {
                debug!("access token already renewed by a concurrent request");
                return Ok(current);
            }
            None if rejected.is_some() => {
                debug!("session already ended by a concurrent request");
                return Err(TransportError::SessionExpired);
            }
            _ => {}
        }

        match self.exchange_refresh_token().await {
            Ok(access) => Ok(access),
            Err(reason) => Err(self.expire_session(&reason)),
        }
    }

    async fn exchange_refresh_token(&self) -> Result<SecretString, String> {
        let Some(refresh) = self.session.refresh_token() else {
            return Err("no refresh token cached".to_string());
        };

        let request = ApiRequest::post(REFRESH_PATH)
            .with_json(json!({ "refresh": refresh.expose_secret() }))
            .anonymous();
        let response = self
            .http
            .execute(&request)
            .await
            .map_err(|e| format!("refresh request failed: {e}"))?;
        if !response.is_success() {
            return Err(format!("refresh rejected with {}", response.status));
        }

        let renewed: RefreshedAccess = response
            .decode()
            .map_err(|e| format!("malformed refresh response: {e}"))?;
        if let Some(rotated) = renewed.refresh {
            self.session.set_refresh_token(rotated);
        }
        self.session.set_access_token(renewed.access.clone());
        info!("access token renewed");
        Ok(renewed.access)
    }

    fn expire_session(&self, reason: &str) -> TransportError {
        warn!(reason, "session expired, clearing credentials");
        self.session.clear();
        self.events.publish(AppEvent::SessionExpired);
        TransportError::SessionExpired
    }
}

impl std::fmt::Debug for AuthenticatedTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedTransport")
            .field("pending", &self.busy.pending())
            .finish_non_exhaustive()
    }
}

fn accept(response: ApiResponse) -> Result<ApiResponse, TransportError> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(TransportError::from_response(&response))
    }
}

fn same_secret(presented: Option<&SecretString>, current: &SecretString) -> bool {
    presented.is_some_and(|p| p.expose_secret() == current.expose_secret())
}
