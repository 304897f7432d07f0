//! Gateway configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Project records themselves are not
//! configuration; they are provisioned externally and optionally seeded
//! from `PROJECTS_SEED_PATH` at startup.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Top-level gateway configuration.
///
/// Loaded once at startup via [`GatewayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// Rate-limit window in seconds.
    pub rate_limit_window_secs: u64,

    /// Request budget per window. Together with the window this yields the
    /// minimum inter-arrival gap enforced per source IP.
    pub rate_limit_max_requests: u32,

    /// Name of the reserved honeypot field in submission bodies.
    pub honeypot_field: String,

    /// Connect/send timeout for outbound SMTP relay attempts, in seconds.
    pub smtp_timeout_secs: u64,

    /// Optional JSON file of projects to load into the store at startup.
    /// Stands in for the external project-provisioning service.
    pub projects_seed_path: Option<PathBuf>,
}

impl GatewayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()?;

        let rate_limit_window_secs = parse_env("RATE_LIMIT_WINDOW_SECS", 60);
        let rate_limit_max_requests = parse_env("RATE_LIMIT_MAX_REQUESTS", 5);

        let honeypot_field =
            std::env::var("HONEYPOT_FIELD").unwrap_or_else(|_| "_honeypot".to_string());

        let smtp_timeout_secs = parse_env("SMTP_TIMEOUT_SECS", 30);

        let projects_seed_path = std::env::var("PROJECTS_SEED_PATH").ok().map(PathBuf::from);

        Ok(Self {
            listen_addr,
            rate_limit_window_secs,
            rate_limit_max_requests,
            honeypot_field,
            smtp_timeout_secs,
            projects_seed_path,
        })
    }

    /// Rate-limit window as a [`Duration`].
    #[must_use]
    pub const fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }

    /// SMTP relay timeout as a [`Duration`].
    #[must_use]
    pub const fn smtp_timeout(&self) -> Duration {
        Duration::from_secs(self.smtp_timeout_secs)
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
