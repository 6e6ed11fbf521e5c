//! Resend transactional email API notifier.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use super::{NotificationEmail, Notifier};
use crate::error::NotifyError;

const NAME: &str = "resend";

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
    reply_to: &'a str,
}

/// Sends notifications with `POST /emails`.
pub struct ResendNotifier {
    api_key: SecretString,
    base_url: String,
    client: reqwest::Client,
}

impl ResendNotifier {
    pub fn new(api_key: SecretString, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self) -> String {
        format!("{}/emails", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl Notifier for ResendNotifier {
    fn name(&self) -> &str {
        NAME
    }

    async fn notify(&self, email: &NotificationEmail) -> Result<(), NotifyError> {
        let body = SendEmailRequest {
            from: &email.from,
            to: &email.to,
            subject: &email.subject,
            html: &email.html,
            reply_to: &email.reply_to,
        };

        let resp = self
            .client
            .post(self.api_url())
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| NotifyError::SendFailed {
                name: NAME.into(),
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(NotifyError::SendFailed {
                name: NAME.into(),
                reason: format!("HTTP {status}: {detail}"),
            });
        }

        tracing::info!(to = %email.to, "Notification email sent");
        Ok(())
    }
}
