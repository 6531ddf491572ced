//! ProjectHub Domain - Core types
//!
//! This crate defines the domain model of the ProjectHub client:
//! project records and their paginated envelopes, credentials, account
//! payloads with their local validation rules, and the request/response
//! values exchanged with the API. All types here are pure Rust with no I/O.

pub mod error;
pub mod id;
pub mod project;
pub mod request;
pub mod response;
pub mod session;
pub mod validation;

pub use error::{DomainError, DomainResult};
pub use id::generate_request_id;
pub use project::{
    CreatedProject, Cursor, MemberInvite, MemberRole, NewProject, Project, ProjectId, ProjectPage,
    ProjectPin, ProjectRole, ProjectSummary, SearchResults,
};
pub use request::{Access, ApiRequest, HttpMethod};
pub use response::{ApiResponse, ErrorPayload, StatusCode};
pub use session::{
    LoginCredentials, LoginResponse, RefreshedAccess, Registration, TokenPair, UserProfile,
};
