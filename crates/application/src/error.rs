//! Application error types

use projecthub_domain::DomainError;
use thiserror::Error;

use crate::collections::StoreError;
use crate::transport::TransportError;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Local validation rejected the input; nothing was sent.
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// The request failed or was rejected by the server.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A collection could not be refreshed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Returns true if the session was torn down; the user has already
    /// been sent to sign in and nothing more should be reported.
    #[must_use]
    pub const fn is_session_expired(&self) -> bool {
        match self {
            Self::Transport(error) => error.is_session_expired(),
            Self::Store(error) => error.is_session_expired(),
            Self::Domain(_) | Self::Internal(_) => false,
        }
    }
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
