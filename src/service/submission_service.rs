//! Submission pipeline: the request-handling state machine.
//!
//! Sequences auth → project resolution → spam gate → validation →
//! persistence → mail relay → event logging for one inbound submission.
//! Early exits map to [`GatewayError`] variants; there is no rollback:
//! once a submission record is persisted it stays, whatever later stages
//! do. Relay and log-append failures are contained here and can never
//! turn an accepted submission into a failed response.

use std::sync::Arc;

use serde_json::{Map, Value, json};

use crate::domain::{MailEvent, MailLog, Project, ProjectId, Provenance, Submission};
use crate::error::GatewayError;
use crate::service::mail_relay::{MailRelay, OutgoingEmail};
use crate::service::spam_filter::{SpamCheckInput, SpamFilter};
use crate::service::validation::validate_and_sanitize;
use crate::store::{MailLogStore, ProjectStore, SubmissionStore};

/// Everything the pipeline needs from one HTTP request, already
/// extracted from headers and path by the handler.
#[derive(Debug, Clone)]
pub struct SubmissionRequest {
    /// Raw project id path segment (not yet parsed).
    pub project_id: String,
    /// Value of the `X-API-Key` header, if present.
    pub api_key: Option<String>,
    /// Raw `Origin` header value, empty when absent.
    pub origin: String,
    /// Parsed JSON body.
    pub body: Value,
    /// Request provenance (ip, user agent, referrer).
    pub provenance: Provenance,
}

/// Orchestration layer for the submission pipeline.
///
/// Stateless coordinator: owns references to the stores plus the spam
/// filter and relay. Each call to [`SubmissionService::handle`] walks the
/// fixed stage order; the only shared mutable state underneath is the
/// rate limiter inside the spam filter.
#[derive(Debug, Clone)]
pub struct SubmissionService {
    projects: Arc<ProjectStore>,
    submissions: Arc<SubmissionStore>,
    mail_log: Arc<MailLogStore>,
    spam_filter: SpamFilter,
    relay: MailRelay,
    honeypot_field: String,
}

impl SubmissionService {
    /// Creates a new `SubmissionService`.
    #[must_use]
    pub fn new(
        projects: Arc<ProjectStore>,
        submissions: Arc<SubmissionStore>,
        mail_log: Arc<MailLogStore>,
        spam_filter: SpamFilter,
        relay: MailRelay,
        honeypot_field: String,
    ) -> Self {
        Self {
            projects,
            submissions,
            mail_log,
            spam_filter,
            relay,
            honeypot_field,
        }
    }

    /// Runs one submission through the pipeline.
    ///
    /// `Ok(())` means the submission was accepted and persisted; a relay
    /// failure still counts as accepted (recorded as `bounced`).
    ///
    /// # Errors
    ///
    /// - [`GatewayError::MissingApiKey`] / [`GatewayError::InvalidCredentials`]
    ///   when authentication fails (nothing written);
    /// - [`GatewayError::ProjectInactive`] for deactivated projects;
    /// - [`GatewayError::SpamRejected`] after recording the flagged
    ///   submission and a `blocked` log entry;
    /// - [`GatewayError::ValidationFailed`] with per-field messages
    ///   (nothing written, unlike the spam path);
    /// - [`GatewayError::Store`] when submission persistence fails.
    pub async fn handle(&self, request: SubmissionRequest) -> Result<(), GatewayError> {
        let api_key = request
            .api_key
            .as_deref()
            .ok_or(GatewayError::MissingApiKey)?;
        let project_id =
            ProjectId::parse(&request.project_id).ok_or(GatewayError::InvalidCredentials)?;

        let project = self.projects.resolve(project_id, api_key).await?;
        if !project.is_active {
            return Err(GatewayError::ProjectInactive);
        }

        let verdict = self.spam_filter.check(&SpamCheckInput {
            ip: &request.provenance.ip,
            user_agent: &request.provenance.user_agent,
            origin: &request.origin,
            body: &request.body,
            allowed_domains: &project.allowed_domains,
            honeypot_field: &self.honeypot_field,
        });

        if verdict.is_spam {
            let reason = verdict
                .reason
                .unwrap_or_else(|| "Spam detected".to_string());
            return Err(self.reject_as_spam(&project, request, reason).await);
        }

        let report = validate_and_sanitize(&project.form_schema, &request.body);
        if !report.is_valid {
            return Err(GatewayError::ValidationFailed {
                errors: report.errors,
            });
        }
        let sanitized = report.sanitized_data;

        if project.relay_enabled() {
            self.relay_notification(&project, &sanitized).await;
        }

        self.submissions
            .insert(Submission::new(
                project.id,
                Value::Object(sanitized),
                request.provenance,
                false,
            ))
            .await?;

        tracing::info!(project_id = %project.id, "submission accepted");
        Ok(())
    }

    /// Records the flagged submission plus a best-effort `blocked` log
    /// entry, returning the error the handler will surface.
    async fn reject_as_spam(
        &self,
        project: &Project,
        request: SubmissionRequest,
        reason: String,
    ) -> GatewayError {
        tracing::info!(project_id = %project.id, reason = %reason, "submission blocked");

        // The raw, unsanitized body is kept for later review.
        let persisted = self
            .submissions
            .insert(Submission::new(
                project.id,
                request.body,
                request.provenance,
                true,
            ))
            .await;
        if let Err(e) = persisted {
            return e;
        }

        let mut entry = MailLog::record(project.id, MailEvent::Blocked, reason.clone());
        entry.subject = Some(format!("Blocked submission for {}", project.name));
        entry.to = project.mail_recipient();
        entry.meta = Some(json!({
            "type": "spam",
            "origin": request.origin,
        }));
        if let Err(e) = self.mail_log.append(entry).await {
            tracing::warn!(project_id = %project.id, error = %e, "failed to log blocked event");
        }

        GatewayError::SpamRejected { reason }
    }

    /// Composes and relays the notification email, logging the terminal
    /// outcome. Never fails the pipeline: a relay error becomes a
    /// `bounced` entry and nothing more.
    async fn relay_notification(&self, project: &Project, sanitized: &Map<String, Value>) {
        let Some(smtp) = project.smtp_settings.as_ref() else {
            return;
        };

        let to = project.mail_recipient().unwrap_or_default();
        let subject = format!("New Submission for {}", project.name);
        let email = OutgoingEmail {
            to: to.clone(),
            subject: subject.clone(),
            html: render_html(sanitized),
            text: render_text(sanitized),
            from: None,
        };

        match self.relay.send(smtp, &email).await {
            Ok(receipt) => {
                tracing::info!(
                    project_id = %project.id,
                    message_id = %receipt.message_id,
                    "submission notification delivered"
                );
                let mut entry =
                    MailLog::record(project.id, MailEvent::Delivered, receipt.response);
                entry.subject = Some(subject);
                entry.to = Some(to);
                entry.meta = Some(json!({
                    "messageId": receipt.message_id,
                    "accepted": receipt.accepted,
                    "rejected": receipt.rejected,
                }));
                if let Err(e) = self.mail_log.append(entry).await {
                    tracing::warn!(project_id = %project.id, error = %e, "failed to log delivery");
                }
            }
            Err(err) => {
                tracing::warn!(project_id = %project.id, error = %err, "submission notification bounced");
                let status = match err {
                    GatewayError::MailRelay(message) => message,
                    other => other.to_string(),
                };
                let mut entry = MailLog::record(project.id, MailEvent::Bounced, status);
                entry.subject = Some(format!("Failed submission for {}", project.name));
                entry.to = project.mail_recipient();
                if let Err(e) = self.mail_log.append(entry).await {
                    tracing::warn!(project_id = %project.id, error = %e, "failed to log bounce");
                }
            }
        }
    }
}

/// `<h2>New Form Submission</h2>` plus one `<b>key:</b> value` line per
/// sanitized field. Values are already HTML-escaped by the validator.
fn render_html(sanitized: &Map<String, Value>) -> String {
    let fields = sanitized
        .iter()
        .map(|(key, value)| format!("<b>{key}:</b> {}", display_value(value)))
        .collect::<Vec<_>>()
        .join("<br>");
    format!("<h2>New Form Submission</h2><p>{fields}</p>")
}

/// Pretty-printed JSON of the sanitized data, as the plain-text
/// alternative body.
fn render_text(sanitized: &Map<String, Value>) -> String {
    serde_json::to_string_pretty(&Value::Object(sanitized.clone()))
        .unwrap_or_else(|_| "{}".to_string())
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{FieldSchema, FieldType, SmtpSettings};
    use crate::service::RateLimiter;
    use chrono::Utc;
    use std::time::Duration;

    struct Harness {
        projects: Arc<ProjectStore>,
        submissions: Arc<SubmissionStore>,
        mail_log: Arc<MailLogStore>,
        service: SubmissionService,
    }

    fn harness() -> Harness {
        let projects = Arc::new(ProjectStore::new());
        let submissions = Arc::new(SubmissionStore::new());
        let mail_log = Arc::new(MailLogStore::new());
        let limiter = Arc::new(RateLimiter::new(Duration::from_secs(60), 5));
        let service = SubmissionService::new(
            Arc::clone(&projects),
            Arc::clone(&submissions),
            Arc::clone(&mail_log),
            SpamFilter::new(limiter),
            MailRelay::new(Duration::from_secs(2)),
            "_honeypot".to_string(),
        );
        Harness {
            projects,
            submissions,
            mail_log,
            service,
        }
    }

    fn make_project() -> Project {
        Project {
            id: ProjectId::new(),
            user_id: "user-1".to_string(),
            name: "Contact Form".to_string(),
            description: None,
            api_key: Project::generate_api_key(),
            allowed_domains: vec![],
            form_schema: vec![],
            smtp_settings: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn request(project: &Project, body: Value) -> SubmissionRequest {
        SubmissionRequest {
            project_id: project.id.to_string(),
            api_key: Some(project.api_key.clone()),
            origin: "https://example.com".to_string(),
            body,
            provenance: Provenance {
                ip: "203.0.113.10".to_string(),
                user_agent: "test-agent".to_string(),
                referrer: None,
            },
        }
    }

    #[tokio::test]
    async fn missing_api_key_writes_nothing() {
        let h = harness();
        let project = make_project();
        let _ = h.projects.insert(project.clone()).await;

        let mut req = request(&project, json!({"msg": "hi"}));
        req.api_key = None;

        let result = h.service.handle(req).await;
        assert!(matches!(result, Err(GatewayError::MissingApiKey)));
        assert!(h.submissions.is_empty().await);
        assert!(h.mail_log.is_empty().await);
    }

    #[tokio::test]
    async fn stale_api_key_is_rejected() {
        let h = harness();
        let project = make_project();
        let _ = h.projects.insert(project.clone()).await;

        let mut req = request(&project, json!({"msg": "hi"}));
        req.api_key = Some(Project::generate_api_key());

        let result = h.service.handle(req).await;
        assert!(matches!(result, Err(GatewayError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn unparsable_project_id_is_invalid_credentials() {
        let h = harness();
        let project = make_project();
        let _ = h.projects.insert(project.clone()).await;

        let mut req = request(&project, json!({}));
        req.project_id = "definitely-not-a-uuid".to_string();

        let result = h.service.handle(req).await;
        assert!(matches!(result, Err(GatewayError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn inactive_project_is_forbidden() {
        let h = harness();
        let mut project = make_project();
        project.is_active = false;
        let _ = h.projects.insert(project.clone()).await;

        let result = h.service.handle(request(&project, json!({}))).await;
        assert!(matches!(result, Err(GatewayError::ProjectInactive)));
        assert!(h.submissions.is_empty().await);
    }

    // Scenario A: open project, no schema, no SMTP. Accepted, one
    // submission, zero log entries.
    #[tokio::test]
    async fn plain_submission_is_accepted() {
        let h = harness();
        let project = make_project();
        let _ = h.projects.insert(project.clone()).await;

        let result = h
            .service
            .handle(request(&project, json!({"email": "a@b.com", "msg": "hi"})))
            .await;
        assert!(result.is_ok());

        let stored = h.submissions.list_by_project(project.id).await;
        assert_eq!(stored.len(), 1);
        let Some(submission) = stored.first() else {
            panic!("submission should be stored");
        };
        assert!(!submission.spam_detected);
        assert_eq!(submission.data.get("msg"), Some(&json!("hi")));
        assert!(h.mail_log.is_empty().await);
    }

    // Scenario B: honeypot filled. 400, raw body stored flagged, one
    // blocked log entry.
    #[tokio::test]
    async fn honeypot_submission_is_blocked_and_recorded() {
        let h = harness();
        let project = make_project();
        let _ = h.projects.insert(project.clone()).await;

        let body = json!({"msg": "<raw>", "_honeypot": "bot"});
        let result = h.service.handle(request(&project, body.clone())).await;
        let Err(GatewayError::SpamRejected { reason }) = result else {
            panic!("expected spam rejection");
        };
        assert_eq!(reason, "Honeypot filled");

        let stored = h.submissions.list_by_project(project.id).await;
        assert_eq!(stored.len(), 1);
        let Some(submission) = stored.first() else {
            panic!("submission should be stored");
        };
        assert!(submission.spam_detected);
        // Raw body, honeypot field and unsanitized angle brackets intact.
        assert_eq!(submission.data, body);

        let page = h.mail_log.list(project.id, 1, 20).await;
        assert_eq!(page.total, 1);
        let Some(entry) = page.entries.first() else {
            panic!("log entry should exist");
        };
        assert_eq!(entry.event, MailEvent::Blocked);
        assert_eq!(entry.status, "Honeypot filled");
    }

    // Scenario C: schema rejection writes no submission and no log entry.
    #[tokio::test]
    async fn validation_failure_writes_nothing() {
        let h = harness();
        let mut project = make_project();
        project.form_schema = vec![
            FieldSchema {
                id: "email".to_string(),
                label: "Email".to_string(),
                field_type: FieldType::Email,
                required: true,
                options: vec![],
                placeholder: None,
            },
            FieldSchema {
                id: "age".to_string(),
                label: "Age".to_string(),
                field_type: FieldType::Number,
                required: true,
                options: vec![],
                placeholder: None,
            },
        ];
        let _ = h.projects.insert(project.clone()).await;

        let result = h
            .service
            .handle(request(&project, json!({"email": "x", "age": "5"})))
            .await;
        let Err(GatewayError::ValidationFailed { errors }) = result else {
            panic!("expected validation failure");
        };
        assert_eq!(errors, vec!["Email must be a valid email."]);

        assert!(h.submissions.is_empty().await);
        assert!(h.mail_log.is_empty().await);
    }

    // Scenario D: unreachable relay. Still accepted, bounced entry with
    // a non-empty status.
    #[tokio::test]
    async fn relay_failure_still_accepts_the_submission() {
        let h = harness();
        let mut project = make_project();
        project.smtp_settings = Some(SmtpSettings {
            host: "127.0.0.1".to_string(),
            port: 1,
            secure: false,
            username: Some("relay@example.com".to_string()),
            password: Some("secret".to_string()),
            from_email: None,
            to_email: Some("inbox@example.com".to_string()),
        });
        let _ = h.projects.insert(project.clone()).await;

        let result = h
            .service
            .handle(request(&project, json!({"msg": "hi"})))
            .await;
        assert!(result.is_ok());

        let stored = h.submissions.list_by_project(project.id).await;
        assert_eq!(stored.len(), 1);

        let page = h.mail_log.list(project.id, 1, 20).await;
        assert_eq!(page.total, 1);
        let Some(entry) = page.entries.first() else {
            panic!("log entry should exist");
        };
        assert_eq!(entry.event, MailEvent::Bounced);
        assert!(!entry.status.is_empty());
        assert_eq!(entry.to.as_deref(), Some("inbox@example.com"));
    }

    #[tokio::test]
    async fn rapid_repeat_submission_is_rate_limited() {
        let h = harness();
        let project = make_project();
        let _ = h.projects.insert(project.clone()).await;

        let first = h.service.handle(request(&project, json!({"n": 1}))).await;
        assert!(first.is_ok());

        let second = h.service.handle(request(&project, json!({"n": 2}))).await;
        let Err(GatewayError::SpamRejected { reason }) = second else {
            panic!("expected rate-limit rejection");
        };
        assert_eq!(reason, "Rate limit exceeded");

        // The flagged submission is stored alongside the accepted one.
        let stored = h.submissions.list_by_project(project.id).await;
        assert_eq!(stored.len(), 2);
        assert_eq!(stored.iter().filter(|s| s.spam_detected).count(), 1);
    }

    #[tokio::test]
    async fn disallowed_origin_is_blocked() {
        let h = harness();
        let mut project = make_project();
        project.allowed_domains = vec!["example.com".to_string()];
        let _ = h.projects.insert(project.clone()).await;

        let mut req = request(&project, json!({"msg": "hi"}));
        req.origin = "https://attacker.example".to_string();

        let result = h.service.handle(req).await;
        let Err(GatewayError::SpamRejected { reason }) = result else {
            panic!("expected origin rejection");
        };
        assert_eq!(reason, "Origin not allowed");
    }

    #[test]
    fn html_body_lists_fields_with_breaks() {
        let mut data = Map::new();
        data.insert("email".to_string(), json!("a@b.com"));
        data.insert("msg".to_string(), json!("hello"));

        let html = render_html(&data);
        assert!(html.starts_with("<h2>New Form Submission</h2>"));
        assert!(html.contains("<b>email:</b> a@b.com"));
        assert!(html.contains("<br>"));
    }

    #[test]
    fn text_body_is_pretty_json() {
        let mut data = Map::new();
        data.insert("age".to_string(), json!(35));

        let text = render_text(&data);
        assert!(text.contains("\"age\": 35"));
    }
}
