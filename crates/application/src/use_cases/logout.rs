//! Sign out.

use std::sync::Arc;

use tracing::info;

use crate::events::{AppEvent, EventBus};
use crate::ports::SessionStore;

/// Use case for signing out: forgets every cached session key.
pub struct Logout {
    session: Arc<dyn SessionStore>,
    events: EventBus,
}

impl Logout {
    /// Creates a new `Logout` use case.
    #[must_use]
    pub const fn new(session: Arc<dyn SessionStore>, events: EventBus) -> Self {
        Self { session, events }
    }

    /// Clears the session and publishes [`AppEvent::LoggedOut`].
    pub fn execute(&self) {
        self.session.clear();
        info!("signed out");
        self.events.publish(AppEvent::LoggedOut);
    }
}
