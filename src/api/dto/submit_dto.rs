//! DTOs for the public submission endpoint.

use serde::Serialize;
use utoipa::ToSchema;

/// Success body for an accepted submission.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubmitAccepted {
    /// Always `true`.
    pub success: bool,
    /// Fixed confirmation message.
    pub message: String,
}

impl SubmitAccepted {
    /// The one success payload the endpoint ever returns.
    #[must_use]
    pub fn new() -> Self {
        Self {
            success: true,
            message: "Form submitted successfully".to_string(),
        }
    }
}

impl Default for SubmitAccepted {
    fn default() -> Self {
        Self::new()
    }
}
