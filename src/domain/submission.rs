//! Submission records: one inbound form payload with provenance metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ProjectId;

/// Request provenance captured from HTTP headers, best-effort.
///
/// `ip` and `user_agent` default to `"unknown"` when the header is absent;
/// `referrer` stays `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provenance {
    /// Client IP as reported by `X-Forwarded-For`.
    pub ip: String,
    /// Value of the `User-Agent` header.
    pub user_agent: String,
    /// Value of the `Referer` header, if sent.
    pub referrer: Option<String>,
}

/// One inbound form payload.
///
/// Created exactly once per request that reaches spam rejection or
/// validation, never updated or deleted by the pipeline. `project_id` is a
/// weak reference; the project may later be deleted out from under it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    /// Record identifier.
    pub id: uuid::Uuid,
    /// Owning project (by id, not a strong reference).
    pub project_id: ProjectId,
    /// Sanitized key→value map, or the raw body when rejected as spam.
    pub data: serde_json::Value,
    /// Client IP, `"unknown"` when not reported.
    pub ip: String,
    /// Client user agent, `"unknown"` when not reported.
    pub user_agent: String,
    /// Referring page, if any.
    pub referrer: Option<String>,
    /// Set once at creation, never mutated.
    pub spam_detected: bool,
    /// Immutable creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Submission {
    /// Creates a submission record with a fresh id and timestamp.
    #[must_use]
    pub fn new(
        project_id: ProjectId,
        data: serde_json::Value,
        provenance: Provenance,
        spam_detected: bool,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            project_id,
            data,
            ip: provenance.ip,
            user_agent: provenance.user_agent,
            referrer: provenance.referrer,
            spam_detected,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_stamps_id_and_time() {
        let provenance = Provenance {
            ip: "203.0.113.9".to_string(),
            user_agent: "curl/8.0".to_string(),
            referrer: None,
        };
        let submission = Submission::new(
            ProjectId::new(),
            json!({"msg": "hi"}),
            provenance,
            false,
        );
        assert!(!submission.spam_detected);
        assert_eq!(submission.ip, "203.0.113.9");

        let other = Submission::new(
            submission.project_id,
            json!({}),
            Provenance {
                ip: "unknown".to_string(),
                user_agent: "unknown".to_string(),
                referrer: None,
            },
            true,
        );
        assert_ne!(submission.id, other.id);
        assert!(other.spam_detected);
    }
}
