//! Type-safe project identifier.
//!
//! [`ProjectId`] is a newtype wrapper around [`uuid::Uuid`] (v4) providing
//! type safety so that project identifiers cannot be confused with other
//! UUIDs (submission ids, log entry ids).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a tenant project.
///
/// Wraps a UUID v4. Assigned once when the project is provisioned and
/// immutable thereafter. Appears in the public submission URL
/// (`/forms/{projectId}/submit`) and as the foreign key on submissions
/// and mail log entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(uuid::Uuid);

impl ProjectId {
    /// Creates a new random `ProjectId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Creates a `ProjectId` from an existing [`uuid::Uuid`].
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Parses a `ProjectId` from its string form.
    ///
    /// Returns `None` for anything that is not a well-formed UUID; the
    /// submission endpoint treats that the same as an unknown project.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        uuid::Uuid::parse_str(raw).ok().map(Self)
    }

    /// Returns the inner [`uuid::Uuid`].
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<uuid::Uuid> for ProjectId {
    fn from(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }
}

impl From<ProjectId> for uuid::Uuid {
    fn from(id: ProjectId) -> Self {
        id.0
    }
}
