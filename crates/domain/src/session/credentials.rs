//! Credential pair and token metadata.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Access and refresh token issued at login.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPair {
    /// Short-lived bearer credential.
    pub access: SecretString,
    /// Long-lived credential, only good for obtaining a new access token.
    pub refresh: SecretString,
}

impl TokenPair {
    /// Creates a token pair.
    #[must_use]
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: SecretString::new(access.into()),
            refresh: SecretString::new(refresh.into()),
        }
    }
}

/// Response of `POST /api/auth/token/refresh/`.
///
/// Servers that rotate refresh tokens also return a new `refresh`.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshedAccess {
    /// New access token.
    pub access: SecretString,
    /// Rotated refresh token, if the server rotates.
    #[serde(default)]
    pub refresh: Option<SecretString>,
}

#[derive(Deserialize)]
struct Claims {
    exp: Option<i64>,
}

/// Reads the `exp` claim of a JWT access token.
///
/// Returns `None` for opaque tokens or tokens without an expiry; the
/// signature is not checked, the server remains the authority.
#[must_use]
pub fn access_token_expiry(token: &SecretString) -> Option<DateTime<Utc>> {
    let payload = token.expose_secret().split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    let claims: Claims = serde_json::from_slice(&bytes).ok()?;
    DateTime::from_timestamp(claims.exp?, 0)
}
