//! REST endpoint handlers organized by resource.

pub mod logs;
pub mod submit;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes.
pub fn routes() -> Router<AppState> {
    Router::new().merge(submit::routes()).merge(logs::routes())
}
