//! Tenant project configuration: API key, origins, schema, SMTP settings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ProjectId;

/// A tenant's isolated configuration.
///
/// Projects are provisioned by an external CRUD service; the gateway only
/// reads them (plus key rotation via the store's `update`). The API key is
/// the sole credential for the public submission endpoint and is globally
/// unique and immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Opaque project identifier, part of the public submission URL.
    pub id: ProjectId,
    /// Owning user id. Opaque to the gateway; authentication of owners
    /// happens upstream.
    pub user_id: String,
    /// Display name, used in outgoing mail subjects.
    pub name: String,
    /// Optional free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Random hex API key, at least 48 characters.
    pub api_key: String,
    /// Origin allow-list. Empty means no origin restriction.
    #[serde(default)]
    pub allowed_domains: Vec<String>,
    /// Ordered field schema. Empty selects legacy accept-anything mode.
    #[serde(default)]
    pub form_schema: Vec<FieldSchema>,
    /// Tenant-supplied outbound relay settings. `None` disables relay.
    #[serde(default)]
    pub smtp_settings: Option<SmtpSettings>,
    /// Inactive projects reject all submissions.
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Creation timestamp.
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp.
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Generates a fresh API key: 48 characters of random hex
    /// (24 random bytes, sourced from two v4 UUIDs).
    #[must_use]
    pub fn generate_api_key() -> String {
        let mut key = format!(
            "{}{}",
            uuid::Uuid::new_v4().simple(),
            uuid::Uuid::new_v4().simple()
        );
        key.truncate(48);
        key
    }

    /// Returns `true` if the project has a usable relay configuration.
    #[must_use]
    pub fn relay_enabled(&self) -> bool {
        self.smtp_settings
            .as_ref()
            .is_some_and(|smtp| !smtp.host.is_empty())
    }

    /// Default mail recipient: the configured `to_email`, falling back to
    /// the SMTP username.
    #[must_use]
    pub fn mail_recipient(&self) -> Option<String> {
        let smtp = self.smtp_settings.as_ref()?;
        smtp.to_email.clone().or_else(|| smtp.username.clone())
    }
}

fn default_true() -> bool {
    true
}

/// Per-project outbound SMTP relay configuration.
///
/// Supplied by the tenant at provisioning time; the gateway never holds a
/// global mail account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmtpSettings {
    /// Relay hostname. An empty host disables relay.
    pub host: String,
    /// Relay port, typically 465 (implicit TLS) or 587.
    pub port: u16,
    /// `true` selects implicit TLS; `false` STARTTLS/plain.
    #[serde(default)]
    pub secure: bool,
    /// Optional auth username. Absent means an unauthenticated session.
    #[serde(default)]
    pub username: Option<String>,
    /// Optional auth password.
    #[serde(default)]
    pub password: Option<String>,
    /// Preferred envelope sender.
    #[serde(default)]
    pub from_email: Option<String>,
    /// Preferred recipient for submission notifications.
    #[serde(default)]
    pub to_email: Option<String>,
}

/// One element of a project's ordered form schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    /// Stable field key (alphanumeric/underscore), unique within a schema.
    pub id: String,
    /// Display name, used verbatim in validation error messages.
    pub label: String,
    /// Field type selecting the validation rule.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Whether an absent/empty value is an error.
    #[serde(default)]
    pub required: bool,
    /// Choices for `select` fields; ignored elsewhere.
    #[serde(default)]
    pub options: Vec<String>,
    /// Optional UI hint; not used by validation.
    #[serde(default)]
    pub placeholder: Option<String>,
}

/// Supported form field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Single-line text.
    Text,
    /// Email address, validated against a `local@domain.tld` pattern.
    Email,
    /// Numeric value, coerced to a JSON number.
    Number,
    /// Multi-line text.
    Textarea,
    /// Boolean checkbox.
    Checkbox,
    /// One of a fixed set of options.
    Select,
}
