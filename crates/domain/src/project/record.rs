//! Project records as the server sends them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Identity key of a project.
///
/// The API issues UUIDs, but older endpoints and fixtures use integers;
/// both are accepted and kept in their textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    /// Creates an id from its textual form.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for ProjectId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for ProjectId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for ProjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Unsigned(u64),
            Signed(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self(text),
            RawId::Unsigned(n) => Self(n.to_string()),
            RawId::Signed(n) => Self(n.to_string()),
        })
    }
}

/// The caller's role within a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProjectRole {
    /// Creator of the project.
    Root,
    /// Member with administrative rights.
    Admin,
    /// Regular member.
    #[default]
    User,
}

impl ProjectRole {
    /// Returns the role as a static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Admin => "admin",
            Self::User => "user",
        }
    }

    /// Returns true for roles that may administer the project.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Root | Self::Admin)
    }
}

impl fmt::Display for ProjectRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contact details of a project's root admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootAdmin {
    /// Display name, falls back to the email server-side.
    pub name: String,
    /// Email address.
    pub email: String,
}

/// A project as listed in the owned, joined and search collections.
///
/// The client never edits a record; a newer copy from the server replaces
/// it whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Identity key.
    pub id: ProjectId,
    /// Project name.
    pub name: String,
    /// The caller's role in this project.
    #[serde(default)]
    pub role: ProjectRole,
    /// Whether the caller owns the project.
    #[serde(default, alias = "isOwner")]
    pub is_owner: bool,
    /// Creation time, when the endpoint reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Root admin, when the endpoint reports it.
    #[serde(
        default,
        rename = "rootAdmin",
        alias = "root_admin",
        skip_serializing_if = "Option::is_none"
    )]
    pub root_admin: Option<RootAdmin>,
}

impl Project {
    /// Creates a project record with the given id and name.
    #[must_use]
    pub fn new(id: impl Into<ProjectId>, name: impl Into<String>, role: ProjectRole) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
            is_owner: matches!(role, ProjectRole::Root),
            created_at: None,
            root_admin: None,
        }
    }
}

/// The minimal project view returned on creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    /// Identity key.
    pub id: ProjectId,
    /// Project name.
    pub name: String,
}
