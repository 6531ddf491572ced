//! Project creation.

use std::sync::Arc;

use projecthub_domain::{ApiRequest, CreatedProject, NewProject};
use tracing::{info, warn};

use crate::collections::{CollectionKind, PaginatedCollectionStore};
use crate::error::{ApplicationError, ApplicationResult};
use crate::events::AppEvent;
use crate::transport::AuthenticatedTransport;

/// Project creation endpoint.
pub const CREATE_PROJECT_PATH: &str = "/api/projects/create/";

/// Use case for creating a project with its first members.
pub struct CreateProject {
    transport: Arc<AuthenticatedTransport>,
    store: Arc<PaginatedCollectionStore>,
}

impl CreateProject {
    /// Creates a new `CreateProject` use case.
    #[must_use]
    pub const fn new(
        transport: Arc<AuthenticatedTransport>,
        store: Arc<PaginatedCollectionStore>,
    ) -> Self {
        Self { transport, store }
    }

    /// Validates and submits the form, then reloads the owned projects so
    /// the new one shows up.
    ///
    /// The returned PIN is shown once and cannot be fetched again, so a
    /// failed reload is only logged.
    ///
    /// # Errors
    ///
    /// - `Domain` for the first broken local rule
    /// - `Transport` if the server rejects the project
    pub async fn execute(&self, form: NewProject) -> ApplicationResult<CreatedProject> {
        let form = form.validated()?;
        let body =
            serde_json::to_value(&form).map_err(|e| ApplicationError::Internal(e.to_string()))?;
        let request = ApiRequest::post(CREATE_PROJECT_PATH).with_json(body);
        let created: CreatedProject = self.transport.fetch_json(request).await?;

        info!(project = %created.project.id, name = %created.project.name, "project created");
        self.transport.events().publish(AppEvent::ProjectCreated {
            project: created.project.clone(),
        });

        if let Err(error) = self.store.reload(CollectionKind::Owned).await {
            warn!(%error, "owned projects not refreshed after creation");
        }
        Ok(created)
    }
}
