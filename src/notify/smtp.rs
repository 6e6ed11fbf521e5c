//! SMTP notifier via lettre, for deployments without the HTTP email API.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use secrecy::ExposeSecret;

use super::{NotificationEmail, Notifier, SmtpConfig};
use crate::error::NotifyError;

const NAME: &str = "smtp";

/// Sends notifications through an SMTP relay (STARTTLS).
pub struct SmtpNotifier {
    config: SmtpConfig,
}

impl SmtpNotifier {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    fn send_blocking(config: &SmtpConfig, message: &Message) -> Result<(), NotifyError> {
        let creds = Credentials::new(
            config.username.clone(),
            config.password.expose_secret().to_string(),
        );

        let transport = SmtpTransport::starttls_relay(&config.host)
            .map_err(|e| NotifyError::SendFailed {
                name: NAME.into(),
                reason: format!("SMTP relay error: {e}"),
            })?
            .port(config.port)
            .credentials(creds)
            .build();

        transport
            .send(message)
            .map_err(|e| NotifyError::SendFailed {
                name: NAME.into(),
                reason: format!("SMTP send failed: {e}"),
            })?;
        Ok(())
    }
}

/// Build the MIME message for a notification.
///
/// An unparseable reply-to (the webhook path may yield `"Unknown"`) is
/// dropped rather than failing the send.
pub fn build_message(email: &NotificationEmail) -> Result<Message, NotifyError> {
    let mut builder = Message::builder()
        .from(parse_mailbox(&email.from)?)
        .to(parse_mailbox(&email.to)?)
        .subject(email.subject.as_str())
        .header(ContentType::TEXT_HTML);

    match email.reply_to.parse::<Mailbox>() {
        Ok(reply_to) => builder = builder.reply_to(reply_to),
        Err(e) => {
            tracing::warn!(reply_to = %email.reply_to, error = %e, "Skipping invalid reply-to address");
        }
    }

    builder
        .body(email.html.clone())
        .map_err(|e| NotifyError::SendFailed {
            name: NAME.into(),
            reason: format!("Failed to build email: {e}"),
        })
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address.parse().map_err(|e| NotifyError::InvalidAddress {
        address: address.to_string(),
        reason: format!("{e}"),
    })
}

#[async_trait]
impl Notifier for SmtpNotifier {
    fn name(&self) -> &str {
        NAME
    }

    async fn notify(&self, email: &NotificationEmail) -> Result<(), NotifyError> {
        let message = build_message(email)?;
        let config = self.config.clone();

        tokio::task::spawn_blocking(move || Self::send_blocking(&config, &message))
            .await
            .map_err(|e| NotifyError::SendFailed {
                name: NAME.into(),
                reason: format!("SMTP task panicked: {e}"),
            })??;

        tracing::info!(to = %email.to, host = %self.config.host, "Notification email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(reply_to: &str) -> NotificationEmail {
        NotificationEmail {
            from: "Relay <noreply@example.com>".into(),
            to: "tom@example.com".into(),
            subject: "Contact: Jane".into(),
            html: "<p>Hi</p>".into(),
            reply_to: reply_to.into(),
        }
    }

    #[test]
    fn builds_html_message_with_reply_to() {
        let message = build_message(&email("jane@example.com")).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Reply-To: jane@example.com"));
        assert!(raw.contains("Content-Type: text/html"));
        assert!(raw.contains("To: tom@example.com"));
    }

    #[test]
    fn invalid_reply_to_is_dropped() {
        let message = build_message(&email("Unknown")).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(!raw.contains("Reply-To"));
    }

    #[test]
    fn invalid_recipient_is_an_error() {
        let mut bad = email("jane@example.com");
        bad.to = "not an address".into();
        assert!(matches!(
            build_message(&bad),
            Err(NotifyError::InvalidAddress { .. })
        ));
    }
}
