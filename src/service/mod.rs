//! Service layer: spam gate, validation, mail relay, and the pipeline.
//!
//! [`SubmissionService`] coordinates the per-request state machine,
//! delegating to [`SpamFilter`] (which owns the shared [`RateLimiter`]),
//! the schema validator, and [`MailRelay`].

pub mod mail_relay;
pub mod rate_limiter;
pub mod spam_filter;
pub mod submission_service;
pub mod validation;

pub use mail_relay::{DeliveryReceipt, MailRelay, OutgoingEmail};
pub use rate_limiter::RateLimiter;
pub use spam_filter::{SpamCheckInput, SpamFilter, SpamVerdict};
pub use submission_service::{SubmissionRequest, SubmissionService};
pub use validation::{ValidationReport, validate_and_sanitize};
