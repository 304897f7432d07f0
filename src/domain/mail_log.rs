//! Append-only mail event records.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ProjectId;

/// Terminal classification of one relay attempt or one blocked request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailEvent {
    /// The tenant's relay accepted the message.
    Delivered,
    /// The relay attempt failed (connect, auth, or transport error).
    Bounced,
    /// The request was blocked before any relay attempt (spam).
    Blocked,
}

impl fmt::Display for MailEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delivered => write!(f, "delivered"),
            Self::Bounced => write!(f, "bounced"),
            Self::Blocked => write!(f, "blocked"),
        }
    }
}

/// One audit record of a terminal pipeline outcome.
///
/// Exactly one entry is written per terminal outcome that specifies one
/// (blocked, delivered, bounced); entries are never updated or deleted.
/// `subject` and `to` are denormalized copies of the outgoing message's
/// metadata and may be absent for blocked events without a mail target.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailLog {
    /// Record identifier.
    pub id: uuid::Uuid,
    /// Owning project.
    pub project_id: ProjectId,
    /// Terminal event classification.
    pub event: MailEvent,
    /// Denormalized message subject.
    #[serde(default)]
    pub subject: Option<String>,
    /// Denormalized recipient address.
    #[serde(default)]
    pub to: Option<String>,
    /// Human-readable outcome: transport response, error message, or
    /// block reason.
    pub status: String,
    /// Free-form auxiliary data (message id and accept/reject lists for
    /// delivered entries; type/origin for blocked ones).
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
    /// Immutable creation timestamp, used for descending-time pagination.
    pub created_at: DateTime<Utc>,
}

impl MailLog {
    /// Creates a log record with a fresh id and timestamp and no
    /// denormalized metadata; callers fill `subject`/`to`/`meta` as needed.
    #[must_use]
    pub fn record(project_id: ProjectId, event: MailEvent, status: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            project_id,
            event,
            subject: None,
            to: None,
            status: status.into(),
            meta: None,
            created_at: Utc::now(),
        }
    }
}
