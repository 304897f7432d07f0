//! Gateway error types with HTTP status code mapping.
//!
//! [`GatewayError`] is the central error type for the gateway. Each variant
//! maps to a specific HTTP status code and the structured JSON error shape
//! returned by the public endpoints.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "success": false,
///   "error": "Validation failed",
///   "details": ["Email must be a valid email."]
/// }
/// ```
///
/// `details` is only present for validation failures.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false` for error responses.
    pub success: bool,
    /// Human-readable error message.
    pub error: String,
    /// Per-field validation messages, when applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// | Category   | Variants                                               | HTTP Status |
/// |------------|--------------------------------------------------------|-------------|
/// | Auth       | `MissingApiKey`, `InvalidCredentials`, `Unauthorized`   | 401         |
/// | Auth       | `ProjectInactive`                                      | 403         |
/// | Abuse      | `SpamRejected`                                         | 400         |
/// | Validation | `ValidationFailed`, `InvalidJson`                      | 400         |
/// | Not found  | `ProjectNotFound`                                      | 404         |
/// | Relay      | `MailRelay` (consumed by the pipeline)                 | 502         |
/// | Internal   | `Store`, `Internal`                                    | 500         |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The `X-API-Key` header was not supplied.
    #[error("Missing API Key")]
    MissingApiKey,

    /// Project id and API key did not resolve to exactly one project.
    #[error("Invalid Project ID or API Key")]
    InvalidCredentials,

    /// The resolved project has been deactivated.
    #[error("Project is inactive")]
    ProjectInactive,

    /// The spam filter rejected the submission.
    #[error("{reason}")]
    SpamRejected {
        /// Short rejection reason, e.g. `"Honeypot filled"`.
        reason: String,
    },

    /// Schema validation rejected the submission.
    #[error("Validation failed")]
    ValidationFailed {
        /// One message per failed field, in schema order.
        errors: Vec<String>,
    },

    /// The request body was not parseable JSON.
    #[error("Invalid JSON body")]
    InvalidJson,

    /// Caller is not authenticated for a project-owner endpoint.
    #[error("Unauthorized")]
    Unauthorized,

    /// Project does not exist or is not owned by the caller.
    #[error("Project not found")]
    ProjectNotFound,

    /// SMTP relay failure. Never surfaced to submitters: the pipeline
    /// converts it into a `bounced` log entry and still reports success.
    #[error("mail relay error: {0}")]
    MailRelay(String),

    /// Document store failure.
    #[error("store error: {0}")]
    Store(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingApiKey | Self::InvalidCredentials | Self::Unauthorized => {
                StatusCode::UNAUTHORIZED
            }
            Self::ProjectInactive => StatusCode::FORBIDDEN,
            Self::SpamRejected { .. } | Self::ValidationFailed { .. } | Self::InvalidJson => {
                StatusCode::BAD_REQUEST
            }
            Self::ProjectNotFound => StatusCode::NOT_FOUND,
            Self::MailRelay(_) => StatusCode::BAD_GATEWAY,
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 5xx details stay server-side; the caller only sees a generic message.
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let (error, details) = match self {
            Self::ValidationFailed { errors } => ("Validation failed".to_string(), Some(errors)),
            Self::MailRelay(_) | Self::Store(_) | Self::Internal(_) => {
                ("Internal Server Error".to_string(), None)
            }
            other => (other.to_string(), None),
        };

        let mut response = axum::Json(ErrorResponse {
            success: false,
            error,
            details,
        })
        .into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_map_to_401() {
        assert_eq!(
            GatewayError::MissingApiKey.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            GatewayError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            GatewayError::Unauthorized.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn inactive_project_maps_to_403() {
        assert_eq!(
            GatewayError::ProjectInactive.status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn rejections_map_to_400() {
        let spam = GatewayError::SpamRejected {
            reason: "Honeypot filled".to_string(),
        };
        assert_eq!(spam.status_code(), StatusCode::BAD_REQUEST);

        let invalid = GatewayError::ValidationFailed { errors: vec![] };
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_errors_do_not_leak() {
        let err = GatewayError::Store("connection refused at 10.0.0.1".to_string());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn spam_reason_is_the_display_message() {
        let err = GatewayError::SpamRejected {
            reason: "Origin not allowed".to_string(),
        };
        assert_eq!(err.to_string(), "Origin not allowed");
    }
}
