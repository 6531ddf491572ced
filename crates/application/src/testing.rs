//! Scripted HTTP client and fixtures for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;
use projecthub_domain::{ApiRequest, ApiResponse, HttpMethod, TokenPair};
use secrecy::ExposeSecret;
use serde_json::{Value, json};
use tokio::sync::Notify;

use crate::events::EventBus;
use crate::ports::{HttpClient, HttpClientError, HttpFuture, SessionStore};
use crate::session::InMemorySessionStore;
use crate::transport::AuthenticatedTransport;

enum Reply {
    Respond(ApiResponse),
    Fail(HttpClientError),
    Gated(ApiResponse, Arc<Notify>),
}

/// A request as it reached the fake, bearer exposed for assertions.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedCall {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub bearer: Option<String>,
}

impl RecordedCall {
    pub(crate) fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Replies are queued per path and consumed first in, first out. The
/// reply is picked when the request is issued, so the order of calls
/// decides which reply each gets. Every reply yields once before
/// resolving to force interleaving of concurrent callers.
#[derive(Default)]
pub(crate) struct FakeHttpClient {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl FakeHttpClient {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn push(&self, path: &str, reply: Reply) {
        self.replies
            .lock()
            .entry(path.to_string())
            .or_default()
            .push_back(reply);
    }

    pub(crate) fn reply(&self, path: &str, status: u16, body: Value) {
        self.push(path, Reply::Respond(ApiResponse::json(status, &body)));
    }

    /// The reply is held back until `gate` is notified.
    pub(crate) fn reply_gated(&self, path: &str, status: u16, body: Value, gate: Arc<Notify>) {
        self.push(path, Reply::Gated(ApiResponse::json(status, &body), gate));
    }

    pub(crate) fn fail(&self, path: &str, error: HttpClientError) {
        self.push(path, Reply::Fail(error));
    }

    pub(crate) fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub(crate) fn calls_to(&self, path: &str) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.path == path)
            .cloned()
            .collect()
    }
}

impl HttpClient for FakeHttpClient {
    fn execute(&self, request: &ApiRequest) -> HttpFuture<'_> {
        self.calls.lock().push(RecordedCall {
            method: request.method,
            path: request.path.clone(),
            query: request.query.clone(),
            body: request.body.clone(),
            bearer: request
                .bearer
                .as_ref()
                .map(|token| token.expose_secret().clone()),
        });
        let reply = self
            .replies
            .lock()
            .get_mut(&request.path)
            .and_then(VecDeque::pop_front);
        let path = request.path.clone();

        Box::pin(async move {
            tokio::task::yield_now().await;
            match reply {
                Some(Reply::Respond(response)) => Ok(response),
                Some(Reply::Fail(error)) => Err(error),
                Some(Reply::Gated(response, gate)) => {
                    gate.notified().await;
                    Ok(response)
                }
                None => Err(HttpClientError::Other(format!(
                    "no scripted reply for {path}"
                ))),
            }
        })
    }
}

/// Transport wired to a fake client and an in-memory session.
pub(crate) struct Harness {
    pub http: Arc<FakeHttpClient>,
    pub session: Arc<InMemorySessionStore>,
    pub events: EventBus,
    pub transport: Arc<AuthenticatedTransport>,
}

impl Harness {
    pub(crate) fn signed_out() -> Self {
        let http = FakeHttpClient::new();
        let session = Arc::new(InMemorySessionStore::new());
        let events = EventBus::new();
        let transport = Arc::new(AuthenticatedTransport::new(
            http.clone(),
            session.clone(),
            events.clone(),
        ));
        Self {
            http,
            session,
            events,
            transport,
        }
    }

    pub(crate) fn signed_in(access: &str, refresh: &str) -> Self {
        let harness = Self::signed_out();
        harness.session.set_tokens(TokenPair::new(access, refresh));
        harness
    }

    pub(crate) fn access_token(&self) -> Option<String> {
        self.session
            .access_token()
            .map(|token| token.expose_secret().clone())
    }
}

/// Project record as the list endpoints return it.
pub(crate) fn project_json(id: u64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "role": "user",
        "is_owner": false,
        "created_at": "2024-05-01T10:00:00Z",
        "rootAdmin": {"name": "Root", "email": "root@example.com"}
    })
}

/// One page of a paginated project listing.
pub(crate) fn page_json(ids: &[(u64, &str)], next_cursor: Option<&str>, has_more: bool) -> Value {
    json!({
        "results": ids.iter().map(|(id, name)| project_json(*id, name)).collect::<Vec<_>>(),
        "next_cursor": next_cursor,
        "has_more": has_more,
    })
}
