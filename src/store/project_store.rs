//! Concurrent in-memory project document store.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::domain::{Project, ProjectId};
use crate::error::GatewayError;

/// Store of provisioned tenant projects.
///
/// Backs the external project-CRUD collaborator with the document-store
/// contract the pipeline needs: lookup by id, lookup by id + API key, and
/// update. Uses a `RwLock<HashMap<...>>` so concurrent submissions can
/// resolve projects without blocking each other.
#[derive(Debug, Default)]
pub struct ProjectStore {
    projects: RwLock<HashMap<ProjectId, Project>>,
}

impl ProjectStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            projects: RwLock::new(HashMap::new()),
        }
    }

    /// Inserts a newly provisioned project.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Store`] if a project with the same id
    /// already exists.
    pub async fn insert(&self, project: Project) -> Result<ProjectId, GatewayError> {
        let id = project.id;
        let mut map = self.projects.write().await;
        if map.contains_key(&id) {
            return Err(GatewayError::Store(format!("project {id} already exists")));
        }
        map.insert(id, project);
        Ok(id)
    }

    /// Looks up a project by id.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ProjectNotFound`] if no such project exists.
    pub async fn get(&self, id: ProjectId) -> Result<Project, GatewayError> {
        let map = self.projects.read().await;
        map.get(&id).cloned().ok_or(GatewayError::ProjectNotFound)
    }

    /// Resolves a project by id AND API key.
    ///
    /// Both must match: a stale key on a valid id fails the same way an
    /// unknown id does, so callers cannot distinguish the two.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidCredentials`] on any mismatch.
    pub async fn resolve(&self, id: ProjectId, api_key: &str) -> Result<Project, GatewayError> {
        let map = self.projects.read().await;
        map.get(&id)
            .filter(|project| project.api_key == api_key)
            .cloned()
            .ok_or(GatewayError::InvalidCredentials)
    }

    /// Replaces an existing project record (key rotation, settings edits).
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ProjectNotFound`] if no such project exists.
    pub async fn update(&self, project: Project) -> Result<(), GatewayError> {
        let mut map = self.projects.write().await;
        if !map.contains_key(&project.id) {
            return Err(GatewayError::ProjectNotFound);
        }
        map.insert(project.id, project);
        Ok(())
    }

    /// Returns the number of stored projects.
    pub async fn len(&self) -> usize {
        self.projects.read().await.len()
    }

    /// Returns `true` if no projects are stored.
    pub async fn is_empty(&self) -> bool {
        self.projects.read().await.is_empty()
    }
}
