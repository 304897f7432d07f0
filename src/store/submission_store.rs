//! Append-only submission record store.

use tokio::sync::RwLock;

use crate::domain::{ProjectId, Submission};
use crate::error::GatewayError;

/// Store of submission records.
///
/// The pipeline only ever appends; reads exist for the external dashboard
/// collaborator and for tests. Records are never updated or deleted here
/// (admin deletion is out of scope).
#[derive(Debug, Default)]
pub struct SubmissionStore {
    submissions: RwLock<Vec<Submission>>,
}

impl SubmissionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            submissions: RwLock::new(Vec::new()),
        }
    }

    /// Appends one submission record.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Store`] on a write failure (the in-memory
    /// backing cannot fail, but the document-store contract can).
    pub async fn insert(&self, submission: Submission) -> Result<uuid::Uuid, GatewayError> {
        let id = submission.id;
        self.submissions.write().await.push(submission);
        Ok(id)
    }

    /// Returns all submissions for a project, newest first.
    pub async fn list_by_project(&self, project_id: ProjectId) -> Vec<Submission> {
        let submissions = self.submissions.read().await;
        let mut matched: Vec<Submission> = submissions
            .iter()
            .filter(|s| s.project_id == project_id)
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matched
    }

    /// Returns the total number of stored submissions.
    pub async fn len(&self) -> usize {
        self.submissions.read().await.len()
    }

    /// Returns `true` if no submissions are stored.
    pub async fn is_empty(&self) -> bool {
        self.submissions.read().await.is_empty()
    }
}
