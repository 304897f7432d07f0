//! Outbound SMTP relay through tenant-supplied servers.
//!
//! One call, one connection, one message, no retries: retry policy (there
//! is none) belongs to the orchestrator. Every connect/auth/transport
//! error surfaces as a single [`GatewayError::MailRelay`], which the
//! pipeline records as a `bounced` event.

use std::time::Duration;

use mail_send::mail_builder::MessageBuilder;
use mail_send::mail_builder::headers::address::{Address, EmailAddress};
use mail_send::{Credentials, SmtpClientBuilder};

use crate::domain::SmtpSettings;
use crate::error::GatewayError;

/// One composed message ready for relay.
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html: String,
    /// Plain-text alternative body.
    pub text: String,
    /// Optional explicit sender, overriding the project's settings.
    pub from: Option<String>,
}

/// What the relay can report about an accepted hand-off.
///
/// The transport does not expose the server's raw `250` line, so
/// `response` carries the same `"Sent"` fallback the original gateway
/// logged when no response string was available.
#[derive(Debug, Clone)]
pub struct DeliveryReceipt {
    /// Client-generated message id, `<uuid@host>` form.
    pub message_id: String,
    /// Outcome string recorded in the mail log.
    pub response: String,
    /// Recipients the relay accepted.
    pub accepted: Vec<String>,
    /// Recipients the relay rejected.
    pub rejected: Vec<String>,
}

/// SMTP relay client factory.
///
/// Holds only the connect/send timeout; every call gets its own
/// connection built from the project's [`SmtpSettings`]; the gateway has
/// no mail account of its own.
#[derive(Debug, Clone)]
pub struct MailRelay {
    timeout: Duration,
}

impl MailRelay {
    /// Creates a relay with the given connect/send timeout.
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Delivers one message through the tenant's SMTP endpoint.
    ///
    /// Sender precedence: the message's explicit `from`, else the
    /// project's `from_email`, else its `username`. Credentials are
    /// attached only when a username is configured; `secure` selects
    /// implicit TLS over STARTTLS/plain.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::MailRelay`] on a missing sender or any
    /// connect, auth, or transport failure. One attempt only.
    pub async fn send(
        &self,
        smtp: &SmtpSettings,
        email: &OutgoingEmail,
    ) -> Result<DeliveryReceipt, GatewayError> {
        let from = resolve_sender(email.from.as_deref(), smtp)
            .ok_or_else(|| GatewayError::MailRelay("no sender address configured".to_string()))?;

        let message_id = format!("<{}@{}>", uuid::Uuid::new_v4().simple(), smtp.host);

        let message = MessageBuilder::new()
            .message_id(message_id.clone())
            .from(single_address(from))
            .to(single_address(email.to.clone()))
            .subject(email.subject.clone())
            .html_body(email.html.clone())
            .text_body(email.text.clone());

        let mut builder = SmtpClientBuilder::new(smtp.host.clone(), smtp.port)
            .implicit_tls(smtp.secure)
            .timeout(self.timeout);

        if let Some(username) = &smtp.username {
            builder = builder.credentials(Credentials::new(
                username.clone(),
                smtp.password.clone().unwrap_or_default(),
            ));
        }

        let mut client = builder
            .connect()
            .await
            .map_err(|e| GatewayError::MailRelay(e.to_string()))?;

        client
            .send(message)
            .await
            .map_err(|e| GatewayError::MailRelay(e.to_string()))?;

        Ok(DeliveryReceipt {
            message_id,
            response: "Sent".to_string(),
            accepted: vec![email.to.clone()],
            rejected: vec![],
        })
    }
}

/// Applies the sender precedence chain.
fn resolve_sender(explicit: Option<&str>, smtp: &SmtpSettings) -> Option<String> {
    explicit
        .map(str::to_owned)
        .or_else(|| smtp.from_email.clone())
        .or_else(|| smtp.username.clone())
}

fn single_address(email: String) -> Address<'static> {
    Address::Address(EmailAddress {
        name: None,
        email: email.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> SmtpSettings {
        SmtpSettings {
            host: "smtp.example.com".to_string(),
            port: 587,
            secure: false,
            username: Some("relay@example.com".to_string()),
            password: Some("secret".to_string()),
            from_email: Some("forms@example.com".to_string()),
            to_email: Some("inbox@example.com".to_string()),
        }
    }

    #[test]
    fn sender_precedence_prefers_explicit_from() {
        let smtp = settings();
        assert_eq!(
            resolve_sender(Some("me@example.com"), &smtp).as_deref(),
            Some("me@example.com")
        );
        assert_eq!(
            resolve_sender(None, &smtp).as_deref(),
            Some("forms@example.com")
        );
    }

    #[test]
    fn sender_falls_back_to_username() {
        let mut smtp = settings();
        smtp.from_email = None;
        assert_eq!(
            resolve_sender(None, &smtp).as_deref(),
            Some("relay@example.com")
        );

        smtp.username = None;
        assert_eq!(resolve_sender(None, &smtp), None);
    }

    #[tokio::test]
    async fn missing_sender_fails_without_connecting() {
        let mut smtp = settings();
        smtp.username = None;
        smtp.from_email = None;

        let relay = MailRelay::new(Duration::from_secs(1));
        let email = OutgoingEmail {
            to: "inbox@example.com".to_string(),
            subject: "s".to_string(),
            html: String::new(),
            text: String::new(),
            from: None,
        };
        let result = relay.send(&smtp, &email).await;
        assert!(matches!(result, Err(GatewayError::MailRelay(_))));
    }

    #[tokio::test]
    async fn unreachable_host_surfaces_one_relay_error() {
        let mut smtp = settings();
        smtp.host = "127.0.0.1".to_string();
        smtp.port = 1;

        let relay = MailRelay::new(Duration::from_secs(2));
        let email = OutgoingEmail {
            to: "inbox@example.com".to_string(),
            subject: "s".to_string(),
            html: "<p>hi</p>".to_string(),
            text: "hi".to_string(),
            from: None,
        };
        let result = relay.send(&smtp, &email).await;
        assert!(matches!(result, Err(GatewayError::MailRelay(_))));
    }
}
