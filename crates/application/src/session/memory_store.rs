//! In-memory session storage.

use std::sync::Arc;

use parking_lot::RwLock;
use projecthub_domain::{ProjectId, TokenPair, UserProfile};
use secrecy::SecretString;

use crate::ports::SessionStore;

#[derive(Debug, Default)]
struct SessionData {
    access: Option<SecretString>,
    refresh: Option<SecretString>,
    user: Option<UserProfile>,
    active_project: Option<ProjectId>,
}

/// Thread-safe session store that lives as long as the process.
///
/// Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    data: Arc<RwLock<SessionData>>,
}

impl InMemorySessionStore {
    /// Creates an empty (signed-out) store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true while an access token is cached.
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.data.read().access.is_some()
    }
}

impl SessionStore for InMemorySessionStore {
    fn access_token(&self) -> Option<SecretString> {
        self.data.read().access.clone()
    }

    fn refresh_token(&self) -> Option<SecretString> {
        self.data.read().refresh.clone()
    }

    fn set_tokens(&self, tokens: TokenPair) {
        let mut data = self.data.write();
        data.access = Some(tokens.access);
        data.refresh = Some(tokens.refresh);
    }

    fn set_access_token(&self, access: SecretString) {
        self.data.write().access = Some(access);
    }

    fn set_refresh_token(&self, refresh: SecretString) {
        self.data.write().refresh = Some(refresh);
    }

    fn user(&self) -> Option<UserProfile> {
        self.data.read().user.clone()
    }

    fn set_user(&self, user: UserProfile) {
        self.data.write().user = Some(user);
    }

    fn active_project(&self) -> Option<ProjectId> {
        self.data.read().active_project.clone()
    }

    fn set_active_project(&self, project: Option<ProjectId>) {
        self.data.write().active_project = project;
    }

    fn clear(&self) {
        *self.data.write() = SessionData::default();
    }
}
