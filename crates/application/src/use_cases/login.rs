//! Sign in.

use std::sync::Arc;

use projecthub_domain::{ApiRequest, LoginCredentials, LoginResponse, UserProfile};
use tracing::info;

use crate::error::ApplicationResult;
use crate::events::AppEvent;
use crate::transport::AuthenticatedTransport;

/// Login endpoint.
pub const LOGIN_PATH: &str = "/api/auth/login/";

/// Use case for signing in with email and password.
pub struct Login {
    transport: Arc<AuthenticatedTransport>,
}

impl Login {
    /// Creates a new `Login` use case.
    #[must_use]
    pub const fn new(transport: Arc<AuthenticatedTransport>) -> Self {
        Self { transport }
    }

    /// Signs in and caches the issued tokens and the user's profile,
    /// replacing any previous session.
    ///
    /// # Errors
    ///
    /// - `Domain` if a field is empty
    /// - `Transport` if the server rejects the credentials or is unreachable
    pub async fn execute(&self, credentials: LoginCredentials) -> ApplicationResult<UserProfile> {
        let credentials = credentials.validated()?;
        let request = ApiRequest::post(LOGIN_PATH)
            .with_json(credentials.to_body())
            .anonymous();
        let response: LoginResponse = self.transport.fetch_json(request).await?;

        let session = self.transport.session();
        session.clear();
        session.set_tokens(response.tokens);
        session.set_user(response.user.clone());

        info!(email = %response.user.email, "signed in");
        self.transport.events().publish(AppEvent::LoggedIn {
            email: response.user.email.clone(),
        });
        Ok(response.user)
    }
}
