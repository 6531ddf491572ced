//! Login and registration payloads.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::TokenPair;
use crate::error::{DomainError, DomainResult};
use crate::validation::is_valid_email;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Special characters of which a password needs at least one.
pub const PASSWORD_SPECIALS: &[char] = &['@', '#', '_'];

/// Profile of the signed-in user, cached with the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Account id.
    pub id: i64,
    /// Email address, also the login name.
    pub email: String,
    /// Display name; empty when the account has no profile.
    #[serde(default)]
    pub full_name: String,
}

/// Email and password for `POST /api/auth/login/`.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    /// Email address.
    pub email: String,
    /// Password.
    pub password: SecretString,
}

impl LoginCredentials {
    /// Creates login credentials.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::new(password.into()),
        }
    }

    /// Checks that both fields are filled in.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` for an empty email or password.
    pub fn validated(self) -> DomainResult<Self> {
        let email = self.email.trim().to_string();
        if email.is_empty() {
            return Err(DomainError::MissingField { field: "email" });
        }
        if self.password.expose_secret().is_empty() {
            return Err(DomainError::MissingField { field: "password" });
        }
        Ok(Self {
            email,
            password: self.password,
        })
    }

    /// JSON body sent to the login endpoint.
    #[must_use]
    pub fn to_body(&self) -> Value {
        json!({
            "email": self.email,
            "password": self.password.expose_secret(),
        })
    }
}

/// Response of `POST /api/auth/login/`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// Issued credentials.
    pub tokens: TokenPair,
    /// The signed-in user.
    pub user: UserProfile,
}

/// Sign-up form for `POST /api/auth/register/`.
#[derive(Debug, Clone)]
pub struct Registration {
    /// Display name.
    pub fullname: String,
    /// Email address.
    pub email: String,
    /// Chosen password.
    pub password: SecretString,
    /// Repetition of the password.
    pub confirm_password: SecretString,
}

impl Registration {
    /// Creates a sign-up form.
    #[must_use]
    pub fn new(
        fullname: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            fullname: fullname.into(),
            email: email.into(),
            password: SecretString::new(password.into()),
            confirm_password: SecretString::new(confirm_password.into()),
        }
    }

    /// Applies the sign-up rules before the form is sent.
    ///
    /// # Errors
    ///
    /// Returns the first broken rule: missing name, malformed email,
    /// mismatching passwords, a short password, or missing character
    /// classes.
    pub fn validated(self) -> DomainResult<Self> {
        let fullname = self.fullname.trim().to_string();
        if fullname.is_empty() {
            return Err(DomainError::MissingField { field: "full name" });
        }

        let email = self.email.trim().to_string();
        if !is_valid_email(&email) {
            return Err(DomainError::InvalidEmail(email));
        }

        let password = self.password.expose_secret();
        if password != self.confirm_password.expose_secret() {
            return Err(DomainError::PasswordMismatch);
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(DomainError::PasswordTooShort {
                min: MIN_PASSWORD_LENGTH,
            });
        }

        let missing = missing_password_rules(password);
        if !missing.is_empty() {
            return Err(DomainError::WeakPassword { missing });
        }

        Ok(Self {
            fullname,
            email,
            password: self.password,
            confirm_password: self.confirm_password,
        })
    }

    /// JSON body sent to the registration endpoint.
    #[must_use]
    pub fn to_body(&self) -> Value {
        json!({
            "fullname": self.fullname,
            "email": self.email,
            "password": self.password.expose_secret(),
            "confirmPassword": self.confirm_password.expose_secret(),
        })
    }
}

fn missing_password_rules(password: &str) -> Vec<&'static str> {
    let rules: [(&'static str, fn(char) -> bool); 4] = [
        ("a lowercase letter", |c| c.is_ascii_lowercase()),
        ("an uppercase letter", |c| c.is_ascii_uppercase()),
        ("a digit", |c| c.is_ascii_digit()),
        ("one of @ # _", |c| PASSWORD_SPECIALS.contains(&c)),
    ];

    rules
        .iter()
        .filter(|(_, test)| !password.chars().any(test))
        .map(|(label, _)| *label)
        .collect()
}
