//! Project domain types

mod new_project;
mod page;
mod record;

pub use new_project::{
    CreatedProject, MAX_INITIAL_MEMBERS, MemberInvite, MemberRole, NewProject, ProjectPin,
};
pub use page::{Cursor, ProjectPage, SearchResults};
pub use record::{Project, ProjectId, ProjectRole, ProjectSummary, RootAdmin};
