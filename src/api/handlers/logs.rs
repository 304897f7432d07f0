//! Mail log retrieval for project owners.
//!
//! Session validation is an upstream concern; this handler consumes the
//! authenticated user id from the `X-User-Id` header an auth proxy
//! injects, and enforces project ownership itself.

use axum::Json;
use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::routing::get;

use crate::api::dto::{LogQuery, LogsResponse, MailLogDto, PaginationMeta};
use crate::app_state::AppState;
use crate::domain::ProjectId;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /projects/{project_id}/logs` — Paginated mail event log.
///
/// # Errors
///
/// Returns [`GatewayError::Unauthorized`] without an authenticated user,
/// and [`GatewayError::ProjectNotFound`] when the project does not exist
/// or belongs to someone else (indistinguishable on purpose).
#[utoipa::path(
    get,
    path = "/projects/{project_id}/logs",
    tag = "Logs",
    summary = "List mail events",
    description = "Returns one page of the project's delivery/bounce/block log, newest first.",
    params(
        ("project_id" = String, Path, description = "Project id"),
        LogQuery,
    ),
    responses(
        (status = 200, description = "One page of log entries", body = LogsResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Unknown or foreign project", body = ErrorResponse),
    )
)]
pub async fn project_logs(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    headers: HeaderMap,
    Query(query): Query<LogQuery>,
) -> Result<Json<LogsResponse>, GatewayError> {
    let user_id = headers
        .get("x-user-id")
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .ok_or(GatewayError::Unauthorized)?;

    let project_id = ProjectId::parse(&project_id).ok_or(GatewayError::ProjectNotFound)?;
    let project = state.projects.get(project_id).await?;
    if project.user_id != user_id {
        return Err(GatewayError::ProjectNotFound);
    }

    let page = state
        .mail_logs
        .list(project_id, query.page(), query.limit())
        .await;

    Ok(Json(LogsResponse {
        success: true,
        logs: page.entries.into_iter().map(MailLogDto::from).collect(),
        pagination: PaginationMeta {
            total: page.total,
            page: page.page,
            page_size: page.page_size,
            total_pages: page.total_pages,
        },
    }))
}

/// Log retrieval routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/projects/{project_id}/logs", get(project_logs))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{MailEvent, MailLog, Project};
    use crate::service::{MailRelay, RateLimiter, SpamFilter, SubmissionService};
    use crate::store::{MailLogStore, ProjectStore, SubmissionStore};
    use axum::http::HeaderValue;
    use chrono::Utc;
    use std::sync::Arc;
    use std::time::Duration;

    fn test_state() -> AppState {
        let projects = Arc::new(ProjectStore::new());
        let submissions = Arc::new(SubmissionStore::new());
        let mail_logs = Arc::new(MailLogStore::new());
        let limiter = Arc::new(RateLimiter::new(Duration::from_secs(60), 5));
        let submission_service = Arc::new(SubmissionService::new(
            Arc::clone(&projects),
            submissions,
            Arc::clone(&mail_logs),
            SpamFilter::new(limiter),
            MailRelay::new(Duration::from_secs(2)),
            "_honeypot".to_string(),
        ));
        AppState {
            submission_service,
            projects,
            mail_logs,
        }
    }

    fn make_project(user_id: &str) -> Project {
        Project {
            id: ProjectId::new(),
            user_id: user_id.to_string(),
            name: "Contact Form".to_string(),
            description: None,
            api_key: Project::generate_api_key(),
            allowed_domains: vec![],
            form_schema: vec![],
            smtp_settings: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn user_headers(user_id: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(user_id) {
            headers.insert("x-user-id", value);
        }
        headers
    }

    fn no_params() -> Query<LogQuery> {
        Query(LogQuery {
            page: None,
            limit: None,
        })
    }

    #[tokio::test]
    async fn missing_user_is_unauthorized() {
        let state = test_state();
        let result = project_logs(
            State(state),
            Path(ProjectId::new().to_string()),
            HeaderMap::new(),
            no_params(),
        )
        .await;
        assert!(matches!(result, Err(GatewayError::Unauthorized)));
    }

    #[tokio::test]
    async fn foreign_project_reads_as_not_found() {
        let state = test_state();
        let project = make_project("owner");
        let _ = state.projects.insert(project.clone()).await;

        let result = project_logs(
            State(state),
            Path(project.id.to_string()),
            user_headers("intruder"),
            no_params(),
        )
        .await;
        assert!(matches!(result, Err(GatewayError::ProjectNotFound)));
    }

    #[tokio::test]
    async fn owner_gets_paginated_logs() {
        let state = test_state();
        let project = make_project("owner");
        let _ = state.projects.insert(project.clone()).await;
        for _ in 0..3 {
            let _ = state
                .mail_logs
                .append(MailLog::record(project.id, MailEvent::Delivered, "Sent"))
                .await;
        }

        let result = project_logs(
            State(state),
            Path(project.id.to_string()),
            user_headers("owner"),
            no_params(),
        )
        .await;
        let Ok(Json(response)) = result else {
            panic!("expected a log page");
        };
        assert!(response.success);
        assert_eq!(response.logs.len(), 3);
        assert_eq!(response.pagination.total, 3);
        assert_eq!(response.pagination.total_pages, 1);
    }

    #[tokio::test]
    async fn unparsable_project_id_reads_as_not_found() {
        let state = test_state();
        let result = project_logs(
            State(state),
            Path("not-a-uuid".to_string()),
            user_headers("owner"),
            no_params(),
        )
        .await;
        assert!(matches!(result, Err(GatewayError::ProjectNotFound)));
    }
}
