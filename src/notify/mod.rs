//! Operator notification: composing and delivering the email that carries
//! the original message and the drafted reply.

mod resend;
mod smtp;
pub mod template;

pub use resend::ResendNotifier;
pub use smtp::{SmtpNotifier, build_message};
pub use template::{NotificationEmail, reply_link};

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::SecretString;

use crate::error::NotifyError;

/// Default Resend API host.
pub const DEFAULT_RESEND_BASE_URL: &str = "https://api.resend.com";

/// SMTP relay settings.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: SecretString,
}

/// Which delivery mechanism to use.
#[derive(Debug, Clone)]
pub enum NotifyBackend {
    Resend {
        api_key: SecretString,
        base_url: String,
    },
    Smtp(SmtpConfig),
}

/// Notification settings.
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    pub backend: NotifyBackend,
    /// Operator address receiving notifications.
    pub to: String,
    /// Sender address.
    pub from: String,
}

/// Delivers a notification email.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &str;

    async fn notify(&self, email: &NotificationEmail) -> Result<(), NotifyError>;
}

/// Create the notifier selected by configuration.
pub fn create_notifier(config: &NotifyConfig) -> Arc<dyn Notifier> {
    match &config.backend {
        NotifyBackend::Resend { api_key, base_url } => {
            tracing::info!("Notifications via Resend ({base_url})");
            Arc::new(ResendNotifier::new(api_key.clone(), base_url.clone()))
        }
        NotifyBackend::Smtp(smtp) => {
            tracing::info!("Notifications via SMTP ({}:{})", smtp.host, smtp.port);
            Arc::new(SmtpNotifier::new(smtp.clone()))
        }
    }
}
