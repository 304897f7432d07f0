//! DTOs for the mail log retrieval endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::PaginationMeta;
use crate::domain::MailLog;

/// One mail log entry as returned to project owners.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MailLogDto {
    /// Record identifier.
    pub id: uuid::Uuid,
    /// Terminal event: `delivered`, `bounced`, or `blocked`.
    pub event: String,
    /// Denormalized message subject, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Denormalized recipient, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Outcome string: transport response, error message, or block reason.
    pub status: String,
    /// Free-form auxiliary data.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub meta: Option<serde_json::Value>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<MailLog> for MailLogDto {
    fn from(entry: MailLog) -> Self {
        Self {
            id: entry.id,
            event: entry.event.to_string(),
            subject: entry.subject,
            to: entry.to,
            status: entry.status,
            meta: entry.meta,
            created_at: entry.created_at,
        }
    }
}

/// Paginated log listing response.
#[derive(Debug, Serialize, ToSchema)]
pub struct LogsResponse {
    /// Always `true` for successful listings.
    pub success: bool,
    /// One page of entries, newest first.
    pub logs: Vec<MailLogDto>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}
