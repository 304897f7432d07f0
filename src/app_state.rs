//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::SubmissionService;
use crate::store::{MailLogStore, ProjectStore};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Submission pipeline orchestrator.
    pub submission_service: Arc<SubmissionService>,
    /// Project store, read by owner-facing endpoints.
    pub projects: Arc<ProjectStore>,
    /// Mail event log, read by the log retrieval endpoint.
    pub mail_logs: Arc<MailLogStore>,
}
