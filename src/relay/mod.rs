//! The message relay: draft a reply to a contact submission, then notify
//! the operator with both.

pub mod submission;

pub use submission::{ContactForm, HONEYPOT_FIELD, Submission, WebhookPayload};

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::{RelayConfig, SiteConfig};
use crate::error::{LlmError, NotifyError};
use crate::llm::{DraftedReply, Drafter, create_drafter};
use crate::notify::{NotificationEmail, Notifier, create_notifier};

/// Draft-then-notify pipeline for a single submission.
///
/// Holds no per-request state; one instance is shared by all handlers.
pub struct MessageRelay {
    drafter: Arc<dyn Drafter>,
    notifier: Arc<dyn Notifier>,
    site: SiteConfig,
    from: String,
    to: String,
}

impl MessageRelay {
    pub fn new(
        drafter: Arc<dyn Drafter>,
        notifier: Arc<dyn Notifier>,
        site: SiteConfig,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self {
            drafter,
            notifier,
            site,
            from: from.into(),
            to: to.into(),
        }
    }

    /// Build the production relay from configuration.
    pub fn from_config(config: &RelayConfig) -> Result<Self, LlmError> {
        Ok(Self::new(
            create_drafter(&config.llm)?,
            create_notifier(&config.notify),
            config.site.clone(),
            config.notify.from.clone(),
            config.notify.to.clone(),
        ))
    }

    pub fn site(&self) -> &SiteConfig {
        &self.site
    }

    /// Ask the drafter for a reply. Failures become a placeholder.
    pub async fn draft(&self, submission: &Submission) -> DraftedReply {
        match self.drafter.draft(submission).await {
            Ok(draft) => {
                info!(
                    provider = self.drafter.name(),
                    chars = draft.text.chars().count(),
                    "Drafted reply"
                );
                draft
            }
            Err(e) => {
                warn!(provider = self.drafter.name(), error = %e, "Draft failed, using placeholder");
                DraftedReply::fallback(&e)
            }
        }
    }

    /// Draft a reply and send the operator notification, in that order.
    ///
    /// Only the notification step can fail; the caller decides whether
    /// that failure is visible to the requester.
    pub async fn process(&self, submission: &Submission) -> Result<(), NotifyError> {
        let draft = self.draft(submission).await;
        let email =
            NotificationEmail::compose(&self.site, &self.from, &self.to, submission, &draft)
                .inspect_err(|e| tracing::error!(error = %e, "Notification render failed"))?;

        self.notifier.notify(&email).await.inspect_err(|e| {
            tracing::error!(notifier = self.notifier.name(), error = %e, "Notification failed");
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::llm::{DRAFT_MISSING, DRAFT_UNAVAILABLE};

    #[derive(Default)]
    struct Calls(Mutex<Vec<String>>);

    impl Calls {
        fn push(&self, call: impl Into<String>) {
            self.0.lock().unwrap().push(call.into());
        }
        fn take(&self) -> Vec<String> {
            std::mem::take(&mut *self.0.lock().unwrap())
        }
    }

    enum DraftOutcome {
        Reply(&'static str),
        Fail,
        Empty,
    }

    struct StubDrafter {
        outcome: DraftOutcome,
        calls: Arc<Calls>,
    }

    #[async_trait]
    impl Drafter for StubDrafter {
        fn name(&self) -> &str {
            "stub"
        }
        async fn draft(&self, submission: &Submission) -> Result<DraftedReply, LlmError> {
            self.calls.push(format!("draft:{}", submission.name));
            match self.outcome {
                DraftOutcome::Reply(text) => Ok(DraftedReply::new(text)),
                DraftOutcome::Fail => Err(LlmError::RequestFailed {
                    provider: "stub".into(),
                    reason: "connection refused".into(),
                }),
                DraftOutcome::Empty => Err(LlmError::EmptyResponse {
                    provider: "stub".into(),
                }),
            }
        }
    }

    struct StubNotifier {
        fail: bool,
        calls: Arc<Calls>,
        sent: Mutex<Vec<NotificationEmail>>,
    }

    #[async_trait]
    impl Notifier for StubNotifier {
        fn name(&self) -> &str {
            "stub"
        }
        async fn notify(&self, email: &NotificationEmail) -> Result<(), NotifyError> {
            self.calls.push("notify");
            self.sent.lock().unwrap().push(email.clone());
            if self.fail {
                Err(NotifyError::SendFailed {
                    name: "stub".into(),
                    reason: "HTTP 500".into(),
                })
            } else {
                Ok(())
            }
        }
    }

    fn relay(outcome: DraftOutcome, fail_notify: bool) -> (MessageRelay, Arc<Calls>, Arc<StubNotifier>) {
        let calls = Arc::new(Calls::default());
        let notifier = Arc::new(StubNotifier {
            fail: fail_notify,
            calls: Arc::clone(&calls),
            sent: Mutex::new(Vec::new()),
        });
        let relay = MessageRelay::new(
            Arc::new(StubDrafter {
                outcome,
                calls: Arc::clone(&calls),
            }),
            notifier.clone(),
            SiteConfig::default(),
            "noreply@example.com",
            "tom@example.com",
        );
        (relay, calls, notifier)
    }

    #[tokio::test]
    async fn drafts_then_notifies() {
        let (relay, calls, notifier) = relay(DraftOutcome::Reply("Hey Jane!"), false);
        let submission = Submission::new("Jane", "jane@example.com", "Hi");

        relay.process(&submission).await.unwrap();

        assert_eq!(calls.take(), ["draft:Jane", "notify"]);
        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].html.contains("Hey Jane!"));
        assert_eq!(sent[0].to, "tom@example.com");
        assert_eq!(sent[0].reply_to, "jane@example.com");
    }

    #[tokio::test]
    async fn draft_failure_still_notifies_with_placeholder() {
        let (relay, calls, notifier) = relay(DraftOutcome::Fail, false);
        let submission = Submission::new("Jane", "jane@example.com", "Hi");

        relay.process(&submission).await.unwrap();

        assert_eq!(calls.take(), ["draft:Jane", "notify"]);
        let sent = notifier.sent.lock().unwrap();
        assert!(sent[0].html.contains(DRAFT_UNAVAILABLE));
    }

    #[tokio::test]
    async fn empty_draft_uses_missing_placeholder() {
        let (relay, _calls, notifier) = relay(DraftOutcome::Empty, false);
        relay
            .process(&Submission::new("Jane", "jane@example.com", "Hi"))
            .await
            .unwrap();
        assert!(notifier.sent.lock().unwrap()[0].html.contains(DRAFT_MISSING));
    }

    #[tokio::test]
    async fn notify_failure_is_returned() {
        let (relay, calls, _notifier) = relay(DraftOutcome::Reply("ok"), true);
        let result = relay
            .process(&Submission::new("Jane", "jane@example.com", "Hi"))
            .await;
        assert!(matches!(result, Err(NotifyError::SendFailed { .. })));
        assert_eq!(calls.take(), ["draft:Jane", "notify"]);
    }
}
