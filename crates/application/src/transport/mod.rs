//! Authenticated access to the project API.

mod busy;
mod client;
mod error;

pub use busy::{BusyTracker, InFlight};
pub use client::{AuthenticatedTransport, REFRESH_PATH};
pub use error::TransportError;
