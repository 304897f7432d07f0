//! Append-only mail event log with paginated retrieval.

use tokio::sync::RwLock;

use crate::domain::{MailLog, ProjectId};
use crate::error::GatewayError;

/// One page of mail log entries, newest first.
#[derive(Debug, Clone)]
pub struct LogPage {
    /// Entries for the requested page, sorted by `created_at` descending.
    pub entries: Vec<MailLog>,
    /// Total number of entries for the project.
    pub total: u64,
    /// Effective page number (clamped, 1-indexed).
    pub page: u64,
    /// Effective page size (clamped).
    pub page_size: u64,
    /// `ceil(total / page_size)`, never below 1.
    pub total_pages: u64,
}

/// Append-only store of [`MailLog`] records.
///
/// Writes are best-effort at call sites: the pipeline catches and logs
/// append failures so they can never alter an already-determined HTTP
/// response. Reads are paginated, newest first.
#[derive(Debug, Default)]
pub struct MailLogStore {
    entries: RwLock<Vec<MailLog>>,
}

impl MailLogStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Appends one log entry.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Store`] on a write failure (the in-memory
    /// backing cannot fail, but the document-store contract can).
    pub async fn append(&self, entry: MailLog) -> Result<(), GatewayError> {
        self.entries.write().await.push(entry);
        Ok(())
    }

    /// Returns one page of a project's log, sorted by `created_at`
    /// descending.
    ///
    /// Non-positive `page`/`page_size` clamp to 1; `total_pages` has a
    /// floor of 1 even for an empty log.
    pub async fn list(&self, project_id: ProjectId, page: i64, page_size: i64) -> LogPage {
        let page = page.max(1) as u64;
        let page_size = page_size.max(1) as u64;

        let entries = self.entries.read().await;
        let mut matched: Vec<MailLog> = entries
            .iter()
            .filter(|e| e.project_id == project_id)
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matched.len() as u64;
        let total_pages = total.div_ceil(page_size).max(1);
        let skip = (page - 1).saturating_mul(page_size);

        let entries = matched
            .into_iter()
            .skip(skip as usize)
            .take(page_size as usize)
            .collect();

        LogPage {
            entries,
            total,
            page,
            page_size,
            total_pages,
        }
    }

    /// Returns the total number of entries across all projects.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns `true` if the log is empty.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
