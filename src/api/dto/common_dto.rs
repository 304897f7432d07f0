//! Shared DTO types used across multiple endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Pagination query parameters for list endpoints.
///
/// Values are taken as signed so that out-of-range input clamps instead
/// of failing deserialization; the store floors both at 1.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct LogQuery {
    /// Page number (1-indexed). Defaults to 1.
    #[serde(default)]
    pub page: Option<i64>,
    /// Items per page. Defaults to 20.
    #[serde(default)]
    pub limit: Option<i64>,
}

impl LogQuery {
    /// Effective page, defaulting to 1.
    #[must_use]
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1)
    }

    /// Effective page size, defaulting to 20.
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(20)
    }
}

/// Pagination metadata included in list responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Total number of items.
    pub total: u64,
    /// Current page number.
    pub page: u64,
    /// Items per page.
    pub page_size: u64,
    /// Total number of pages, never below 1.
    pub total_pages: u64,
}
