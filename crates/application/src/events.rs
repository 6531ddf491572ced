//! Application-wide notifications.
//!
//! Components never reach into each other to announce state changes; they
//! publish an [`AppEvent`] and whoever cares (the shell, the navigation
//! layer) subscribes.

use projecthub_domain::{ProjectId, ProjectSummary};
use tokio::sync::broadcast;
use tracing::trace;

use crate::collections::CollectionKind;

const DEFAULT_CAPACITY: usize = 64;

/// Something other components may need to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Credentials were rejected for good and the session was cleared.
    /// The shell should navigate to the sign-in screen.
    SessionExpired,
    /// A user signed in.
    LoggedIn {
        /// Email of the signed-in user.
        email: String,
    },
    /// The user signed out.
    LoggedOut,
    /// A project was created by the signed-in user.
    ProjectCreated {
        /// The new project.
        project: ProjectSummary,
    },
    /// A project collection was emptied and will refill from page one.
    CollectionReset {
        /// Which collection.
        kind: CollectionKind,
    },
    /// The user switched to another project (or left all projects).
    ActiveProjectChanged {
        /// The project now active.
        project: Option<ProjectId>,
    },
}

/// Fan-out channel for [`AppEvent`]s. Clones publish to the same
/// subscribers.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<AppEvent>,
}

impl EventBus {
    /// Creates a bus with the default backlog per subscriber.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a bus keeping at most `capacity` unread events per
    /// subscriber; slower subscribers observe a lag.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes an event. Having no subscribers is not an error.
    pub fn publish(&self, event: AppEvent) {
        trace!(?event, "publishing event");
        let _ = self.sender.send(event);
    }

    /// Subscribes to events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_subscribers_receive_in_order() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.publish(AppEvent::LoggedOut);
        bus.clone().publish(AppEvent::SessionExpired);

        assert_eq!(rx.recv().await.unwrap(), AppEvent::LoggedOut);
        assert_eq!(rx.recv().await.unwrap(), AppEvent::SessionExpired);
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::new();
        bus.publish(AppEvent::LoggedOut);

        let mut late = bus.subscribe();
        assert!(late.try_recv().is_err());
    }
}
