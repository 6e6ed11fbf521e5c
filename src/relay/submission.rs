//! Inbound submission shapes and their normalization.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::SubmissionError;

/// Name of the hidden honeypot field on the contact form.
pub const HONEYPOT_FIELD: &str = "_gotcha";

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
const UNKNOWN: &str = "Unknown";

/// A normalized contact submission. Lives for one request only.
#[derive(Debug, Clone)]
pub struct Submission {
    /// Correlation id for logs.
    pub id: Uuid,
    pub received_at: DateTime<Utc>,
    pub name: String,
    pub email: String,
    pub message: String,
}

impl Submission {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            received_at: Utc::now(),
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }
}

// ── Direct form ─────────────────────────────────────────────────────────

/// Fields posted by the site's own contact form, as URL-encoded or JSON.
///
/// Decoding never rejects a field for its shape: a repeated form key keeps
/// its first value, and a non-string JSON value counts as absent.
#[derive(Debug, Default)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
    pub honeypot: Option<String>,
}

impl ContactForm {
    /// Decode a request body. URL-encoded when the content type says so,
    /// JSON otherwise.
    pub fn from_body(content_type: &str, body: &[u8]) -> Result<Self, SubmissionError> {
        if content_type.contains(FORM_URLENCODED) {
            serde_urlencoded::from_bytes::<Vec<(String, String)>>(body)
                .map(Self::from_pairs)
                .map_err(|e| SubmissionError::MalformedBody(e.to_string()))
        } else {
            serde_json::from_slice::<Value>(body)
                .map(|value| Self::from_json(&value))
                .map_err(|e| SubmissionError::MalformedBody(e.to_string()))
        }
    }

    fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut form = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "name" => &mut form.name,
                "email" => &mut form.email,
                "message" => &mut form.message,
                HONEYPOT_FIELD => &mut form.honeypot,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        form
    }

    fn from_json(value: &Value) -> Self {
        let field = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            name: field("name"),
            email: field("email"),
            message: field("message"),
            honeypot: field(HONEYPOT_FIELD),
        }
    }

    /// Whether the honeypot was filled in.
    pub fn is_spam(&self) -> bool {
        self.honeypot.as_deref().is_some_and(|v| !v.is_empty())
    }

    /// Validate required fields and build the normalized submission.
    pub fn into_submission(self) -> Result<Submission, SubmissionError> {
        let take = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        let (name, email, message) = (take(self.name), take(self.email), take(self.message));

        let mut missing = Vec::new();
        if name.is_none() {
            missing.push("name");
        }
        if email.is_none() {
            missing.push("email");
        }
        if message.is_none() {
            missing.push("message");
        }

        match (name, email, message) {
            (Some(name), Some(email), Some(message)) => Ok(Submission::new(name, email, message)),
            _ => Err(SubmissionError::MissingFields(missing)),
        }
    }
}

// ── Forwarded webhook ───────────────────────────────────────────────────

/// JSON forwarded by a third-party form backend.
///
/// Field names vary by backend and form, so lookups are lenient:
/// exact key first, then a case-insensitive match, then fallbacks.
#[derive(Debug, Clone)]
pub struct WebhookPayload(Value);

impl WebhookPayload {
    pub fn from_body(body: &[u8]) -> Result<Self, SubmissionError> {
        serde_json::from_slice(body)
            .map(Self)
            .map_err(|e| SubmissionError::MalformedBody(e.to_string()))
    }

    pub fn is_spam(&self) -> bool {
        self.field(HONEYPOT_FIELD).is_some()
    }

    /// Resolve the payload to a submission. Never fails: absent fields
    /// become `"Unknown"`, and an absent message becomes the raw payload.
    pub fn into_submission(self) -> Submission {
        let name = self.field("name").unwrap_or(UNKNOWN).to_string();
        let email = self
            .field("email")
            .or_else(|| self.field("_replyto"))
            .unwrap_or(UNKNOWN)
            .to_string();
        let message = match self.field("message") {
            Some(message) => message.to_string(),
            None => self.0.to_string(),
        };
        Submission::new(name, email, message)
    }

    fn field(&self, key: &str) -> Option<&str> {
        let object = self.0.as_object()?;
        lookup(object, key)
    }
}

fn lookup<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    let non_empty = |v: &'a Value| v.as_str().filter(|s| !s.is_empty());
    object.get(key).and_then(non_empty).or_else(|| {
        object
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case(key))
            .find_map(|(_, v)| non_empty(v))
    })
}
