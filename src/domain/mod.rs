//! Domain layer: tenant projects, submissions, and mail event records.
//!
//! This module contains the gateway's data model: project identity and
//! configuration (API key, origin allow-list, form schema, SMTP settings),
//! submission records with request provenance, and the append-only mail
//! event log entries.

pub mod mail_log;
pub mod project;
pub mod project_id;
pub mod submission;

pub use mail_log::{MailEvent, MailLog};
pub use project::{FieldSchema, FieldType, Project, SmtpSettings};
pub use project_id::ProjectId;
pub use submission::{Provenance, Submission};
