//! `ProjectHub` Application Layer
//!
//! Use cases, ports and the stateful client services of the project hub:
//! the credential-refreshing transport and the paginated project
//! collections.

pub mod collections;
pub mod error;
pub mod events;
pub mod ports;
pub mod session;
pub mod transport;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod testing;

pub use collections::{
    CollectionKind, CollectionPhase, CollectionSnapshot, LoadOutcome, PaginatedCollectionStore,
    SearchDebouncer, SearchOutcome, SearchSnapshot, StoreError, StoreOptions,
};
pub use error::{ApplicationError, ApplicationResult};
pub use events::{AppEvent, EventBus};
pub use ports::{HttpClient, HttpClientError, HttpFuture, SessionStore};
pub use session::{InMemorySessionStore, TokenStatus};
pub use transport::{AuthenticatedTransport, BusyTracker, TransportError};
pub use use_cases::{CreateProject, Login, Logout, Register, SelectProject};
