//! Project creation payloads.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use super::ProjectSummary;
use crate::error::{DomainError, DomainResult};
use crate::validation::is_valid_email;

/// Maximum number of members that can be invited at creation time.
pub const MAX_INITIAL_MEMBERS: usize = 3;

/// Role granted to an invited member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    /// Administrative member.
    Admin,
    /// Regular member.
    #[default]
    User,
}

/// A member row of the creation form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberInvite {
    /// Email of an existing account.
    pub email: String,
    /// Role to grant.
    pub role: MemberRole,
}

impl MemberInvite {
    /// Creates an admin invite.
    #[must_use]
    pub fn admin(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            role: MemberRole::Admin,
        }
    }

    /// Creates a regular-member invite.
    #[must_use]
    pub fn user(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            role: MemberRole::User,
        }
    }
}

/// Body of `POST /api/projects/create/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProject {
    /// Project name.
    pub name: String,
    /// Initial members; the creator is added server-side as root.
    pub members: Vec<MemberInvite>,
}

impl NewProject {
    /// Creates a creation request.
    #[must_use]
    pub fn new(name: impl Into<String>, members: Vec<MemberInvite>) -> Self {
        Self {
            name: name.into(),
            members,
        }
    }

    /// Normalises and checks the form the way the server will.
    ///
    /// Trims the name and emails and drops member rows left blank.
    ///
    /// # Errors
    ///
    /// Returns the first rule the form breaks: missing name, more than
    /// [`MAX_INITIAL_MEMBERS`] members, a malformed email, or no admin.
    pub fn validated(self) -> DomainResult<Self> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::MissingField {
                field: "project name",
            });
        }

        let members: Vec<MemberInvite> = self
            .members
            .into_iter()
            .filter_map(|member| {
                let email = member.email.trim();
                (!email.is_empty()).then(|| MemberInvite {
                    email: email.to_string(),
                    role: member.role,
                })
            })
            .collect();

        if members.len() > MAX_INITIAL_MEMBERS {
            return Err(DomainError::TooManyMembers {
                max: MAX_INITIAL_MEMBERS,
            });
        }

        if let Some(bad) = members.iter().find(|m| !is_valid_email(&m.email)) {
            return Err(DomainError::InvalidEmail(bad.email.clone()));
        }

        if !members.iter().any(|m| m.role == MemberRole::Admin) {
            return Err(DomainError::AdminRequired);
        }

        Ok(Self { name, members })
    }
}

/// One-time credential for destructive project actions.
///
/// The server returns it once, at creation; it is never logged.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct ProjectPin(SecretString);

impl ProjectPin {
    /// Wraps a PIN.
    #[must_use]
    pub const fn new(pin: SecretString) -> Self {
        Self(pin)
    }

    /// Returns the wrapped secret.
    #[must_use]
    pub const fn secret(&self) -> &SecretString {
        &self.0
    }
}

/// Response of `POST /api/projects/create/`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedProject {
    /// The new project.
    pub project: ProjectSummary,
    /// PIN to show the creator exactly once.
    pub pin: ProjectPin,
}
