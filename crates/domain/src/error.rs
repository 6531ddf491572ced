//! Domain error types

use thiserror::Error;

/// Domain-level errors raised by local validation before anything is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required field was empty after trimming.
    #[error("{field} is required")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },

    /// An email address does not look like one.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    /// The password and its confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// The password is shorter than the minimum length.
    #[error("password must be at least {min} characters")]
    PasswordTooShort {
        /// Minimum accepted length.
        min: usize,
    },

    /// The password misses one or more character classes.
    #[error("password must contain {}", .missing.join(", "))]
    WeakPassword {
        /// Human-readable names of the unmet rules.
        missing: Vec<&'static str>,
    },

    /// More members than a new project may start with.
    #[error("at most {max} members can be added when creating a project")]
    TooManyMembers {
        /// Maximum number of members.
        max: usize,
    },

    /// No member of a new project is an admin.
    #[error("at least one member must be an admin")]
    AdminRequired,
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
