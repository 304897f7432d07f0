//! formgate server entry point.
//!
//! Starts the Axum HTTP server with the submission, log retrieval, and
//! health endpoints.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use formgate::api;
use formgate::app_state::AppState;
use formgate::config::GatewayConfig;
use formgate::domain::Project;
use formgate::service::{MailRelay, RateLimiter, SpamFilter, SubmissionService};
use formgate::store::{MailLogStore, ProjectStore, SubmissionStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config =
        GatewayConfig::from_env().map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;
    tracing::info!(addr = %config.listen_addr, "starting formgate");

    // Build stores
    let projects = Arc::new(ProjectStore::new());
    let submissions = Arc::new(SubmissionStore::new());
    let mail_logs = Arc::new(MailLogStore::new());

    // Seed projects, standing in for the external provisioning service
    if let Some(path) = &config.projects_seed_path {
        match seed_projects(&projects, path).await {
            Ok(count) => {
                tracing::info!(count, path = %path.display(), "seeded projects");
            }
            Err(error) => {
                tracing::warn!(error = %error, path = %path.display(), "failed to seed projects");
            }
        }
    }

    // Build service layer
    let rate_limiter = Arc::new(RateLimiter::new(
        config.rate_limit_window(),
        config.rate_limit_max_requests,
    ));
    let submission_service = Arc::new(SubmissionService::new(
        Arc::clone(&projects),
        submissions,
        Arc::clone(&mail_logs),
        SpamFilter::new(rate_limiter),
        MailRelay::new(config.smtp_timeout()),
        config.honeypot_field.clone(),
    ));

    // Build application state
    let app_state = AppState {
        submission_service,
        projects,
        mail_logs,
    };

    // Build router
    let app = api::build_router()
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

/// Loads a JSON array of [`Project`] records into the store.
async fn seed_projects(store: &ProjectStore, path: &Path) -> anyhow::Result<usize> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let records: Vec<Project> = serde_json::from_str(&raw).context("parsing seed projects")?;

    let count = records.len();
    for project in records {
        store.insert(project).await?;
    }
    Ok(count)
}
