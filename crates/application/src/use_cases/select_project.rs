//! Active project selection.

use std::sync::Arc;

use projecthub_domain::ProjectId;
use tracing::debug;

use crate::events::{AppEvent, EventBus};
use crate::ports::SessionStore;

/// Use case for switching the project the user works in.
pub struct SelectProject {
    session: Arc<dyn SessionStore>,
    events: EventBus,
}

impl SelectProject {
    /// Creates a new `SelectProject` use case.
    #[must_use]
    pub const fn new(session: Arc<dyn SessionStore>, events: EventBus) -> Self {
        Self { session, events }
    }

    /// Records `project` (or none) as active and publishes
    /// [`AppEvent::ActiveProjectChanged`].
    pub fn execute(&self, project: Option<ProjectId>) {
        debug!(project = ?project, "active project changed");
        self.session.set_active_project(project.clone());
        self.events
            .publish(AppEvent::ActiveProjectChanged { project });
    }
}
