//! Notification email composition.

use askama::Template;

use crate::config::SiteConfig;
use crate::error::NotifyError;
use crate::llm::DraftedReply;
use crate::relay::Submission;

/// Characters of the message quoted in the subject line.
const SUBJECT_PREVIEW_CHARS: usize = 60;

/// The email sent to the site operator for one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
    /// The submitter's address, so a plain "reply" goes to them.
    pub reply_to: String,
}

/// Operator notification HTML body. Every field is auto-escaped.
#[derive(Template)]
#[template(path = "notification.html")]
struct NotificationHtml<'a> {
    site_name: &'a str,
    name: &'a str,
    email: &'a str,
    message: &'a str,
    reply: &'a str,
    link: &'a str,
    received: &'a str,
}

impl NotificationEmail {
    /// Build the notification for `submission` and its drafted reply.
    pub fn compose(
        site: &SiteConfig,
        from: &str,
        to: &str,
        submission: &Submission,
        draft: &DraftedReply,
    ) -> Result<Self, NotifyError> {
        let preview: String = submission
            .message
            .chars()
            .take(SUBJECT_PREVIEW_CHARS)
            .collect();

        let link = reply_link(site, &submission.email, draft);
        let received = submission
            .received_at
            .format("%Y-%m-%d %H:%M UTC")
            .to_string();
        let html = NotificationHtml {
            site_name: &site.name,
            name: &submission.name,
            email: &submission.email,
            message: &submission.message,
            reply: &draft.text,
            link: &link,
            received: &received,
        }
        .render()
        .map_err(|e| NotifyError::Render(e.to_string()))?;

        Ok(Self {
            from: from.to_string(),
            to: to.to_string(),
            subject: format!("Contact: {} — {}", submission.name, preview),
            html,
            reply_to: submission.email.clone(),
        })
    }
}

/// `mailto:` link pre-filled with the drafted reply.
pub fn reply_link(site: &SiteConfig, email: &str, draft: &DraftedReply) -> String {
    let subject = format!("Re: Your message to {}", site.name);
    format!(
        "mailto:{}?subject={}&body={}",
        email,
        urlencoding::encode(&subject),
        urlencoding::encode(&draft.text)
    )
}
