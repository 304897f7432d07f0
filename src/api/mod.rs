//! REST API layer: route handlers, DTOs, and router composition.
//!
//! Endpoint paths are part of the public contract and are mounted at the
//! root: `/forms/{projectId}/submit`, `/projects/{projectId}/logs`, and
//! `/health`.

pub mod dto;
pub mod handlers;

use axum::Router;

use crate::app_state::AppState;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(handlers::routes())
        .merge(handlers::system::routes())
}
