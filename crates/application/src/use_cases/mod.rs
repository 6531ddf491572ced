//! Use cases (application services)
//!
//! Each use case represents a single user action, orchestrating domain
//! validation, the transport and the collection store.

mod create_project;
mod login;
mod logout;
mod register;
mod select_project;

pub use create_project::{CREATE_PROJECT_PATH, CreateProject};
pub use login::{LOGIN_PATH, Login};
pub use logout::Logout;
pub use register::{REGISTER_PATH, Register};
pub use select_project::SelectProject;
