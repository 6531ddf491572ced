//! Account sign-up.

use std::sync::Arc;

use projecthub_domain::{ApiRequest, Registration};
use serde::Deserialize;
use tracing::info;

use crate::error::ApplicationResult;
use crate::transport::AuthenticatedTransport;

/// Registration endpoint.
pub const REGISTER_PATH: &str = "/api/auth/register/";

#[derive(Debug, Default, Deserialize)]
struct Confirmation {
    #[serde(default)]
    message: Option<String>,
}

/// Use case for creating an account.
pub struct Register {
    transport: Arc<AuthenticatedTransport>,
}

impl Register {
    /// Creates a new `Register` use case.
    #[must_use]
    pub const fn new(transport: Arc<AuthenticatedTransport>) -> Self {
        Self { transport }
    }

    /// Validates the form and creates the account. Returns the server's
    /// confirmation message. The user still has to sign in afterwards.
    ///
    /// # Errors
    ///
    /// - `Domain` for the first broken local rule
    /// - `Transport` with field errors when the server rejects the form
    pub async fn execute(&self, form: Registration) -> ApplicationResult<String> {
        let form = form.validated()?;
        let request = ApiRequest::post(REGISTER_PATH)
            .with_json(form.to_body())
            .anonymous();
        let response = self.transport.execute(request).await?;

        let confirmation: Confirmation = response.decode().unwrap_or_default();
        info!(email = %form.email, "account registered");
        Ok(confirmation
            .message
            .unwrap_or_else(|| "Account created".to_string()))
    }
}
