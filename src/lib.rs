//! # formgate
//!
//! Multi-tenant form-submission gateway. External web forms POST JSON
//! payloads against a per-project endpoint; the gateway authenticates the
//! caller, filters abusive traffic, validates and sanitizes the payload
//! against the tenant's field schema, relays a notification email through
//! the tenant's own SMTP server, and keeps an auditable delivery/event
//! log.
//!
//! ## Architecture
//!
//! ```text
//! Clients (web forms, owner dashboards)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── SubmissionService (service/)
//!     │     ├── SpamFilter ── RateLimiter
//!     │     ├── Validator/Sanitizer
//!     │     └── MailRelay (tenant SMTP)
//!     │
//!     └── Document stores (store/)
//!           Projects · Submissions · MailLog
//! ```
//!
//! Project/account CRUD, session auth, and dashboards live in external
//! services; this crate only consumes their records.

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod store;
