//! Document store layer: projects, submissions, and the mail event log.
//!
//! The durable storage engine is an external collaborator; these in-memory
//! stores model its contract of independent document writes plus simple
//! filter+sort+paginate reads. Each store is a `RwLock`-guarded collection
//! shared behind an `Arc`.

pub mod mail_log_store;
pub mod project_store;
pub mod submission_store;

pub use mail_log_store::{LogPage, MailLogStore};
pub use project_store::ProjectStore;
pub use submission_store::SubmissionStore;
