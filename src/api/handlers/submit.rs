//! Public form submission endpoint.
//!
//! CORS is handled per-request rather than with a router layer: every
//! response, including rejections and 500s, carries the three
//! `Access-Control-*` headers with the caller's Origin echoed back (or
//! `*` when absent), so browsers can always read the outcome.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::SubmitAccepted;
use crate::app_state::AppState;
use crate::domain::Provenance;
use crate::error::{ErrorResponse, GatewayError};
use crate::service::SubmissionRequest;

/// `POST /forms/{project_id}/submit` — Accept one form submission.
///
/// Authenticated by the `X-API-Key` header against the project in the
/// path. The body is an arbitrary JSON object; `_honeypot` is reserved.
#[utoipa::path(
    post,
    path = "/forms/{project_id}/submit",
    tag = "Forms",
    summary = "Submit a form payload",
    description = "Validates, sanitizes, and relays one form submission for the given project. Spam and schema rejections return 400; relay failures are logged and do not fail the request.",
    params(
        ("project_id" = String, Path, description = "Target project id"),
    ),
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Submission accepted", body = SubmitAccepted),
        (status = 400, description = "Spam rejected or validation failed", body = ErrorResponse),
        (status = 401, description = "Missing or invalid credentials", body = ErrorResponse),
        (status = 403, description = "Project is inactive", body = ErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse),
    )
)]
pub async fn submit_form(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let origin = header_or(&headers, header::ORIGIN, "");

    let body = match parse_body(&body) {
        Ok(value) => value,
        Err(err) => return with_cors(err.into_response(), &origin),
    };

    let request = SubmissionRequest {
        project_id,
        api_key: optional_header(&headers, "x-api-key"),
        origin: origin.clone(),
        body,
        provenance: Provenance {
            ip: header_or(&headers, "x-forwarded-for", "unknown"),
            user_agent: header_or(&headers, header::USER_AGENT, "unknown"),
            referrer: optional_header(&headers, header::REFERER),
        },
    };

    let response = match state.submission_service.handle(request).await {
        Ok(()) => (StatusCode::OK, Json(SubmitAccepted::new())).into_response(),
        Err(err) => err.into_response(),
    };
    with_cors(response, &origin)
}

/// `OPTIONS /forms/{project_id}/submit` — CORS preflight.
///
/// Short-circuits before any other pipeline state: 200, empty body,
/// permissive CORS headers only.
pub async fn submit_preflight(headers: HeaderMap) -> Response {
    let origin = header_or(&headers, header::ORIGIN, "");
    with_cors(StatusCode::OK.into_response(), &origin)
}

/// Submission routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/forms/{project_id}/submit",
        post(submit_form).options(submit_preflight),
    )
}

// ── Request/Response Helpers ────────────────────────────────────────────

fn parse_body(raw: &Bytes) -> Result<serde_json::Value, GatewayError> {
    serde_json::from_slice(raw).map_err(|_| GatewayError::InvalidJson)
}

fn header_or(headers: &HeaderMap, name: impl header::AsHeaderName, default: &str) -> String {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or(default)
        .to_string()
}

fn optional_header(headers: &HeaderMap, name: impl header::AsHeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

/// Attaches the CORS header set to an already-built response, echoing
/// the caller's Origin (or `*` when absent/unrepresentable).
fn with_cors(mut response: Response, origin: &str) -> Response {
    let allow_origin = if origin.is_empty() {
        HeaderValue::from_static("*")
    } else {
        HeaderValue::from_str(origin).unwrap_or_else(|_| HeaderValue::from_static("*"))
    };

    let headers = response.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin);
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, X-API-Key"),
    );
    response
}
