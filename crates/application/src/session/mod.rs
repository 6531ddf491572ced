//! Session state kept on the client.

mod memory_store;
mod token_status;

pub use memory_store::InMemorySessionStore;
pub use token_status::{DEFAULT_EXPIRY_BUFFER_SECS, TokenStatus};
