//! Reply drafting for the contact relay.
//!
//! The relay only needs one thing from a language model: a short candidate
//! reply to a submission. `Drafter` is that seam; rig-core provides the
//! Anthropic transport and `RigDrafter` bridges its `CompletionModel` to it.

pub mod prompts;
mod rig_adapter;

pub use rig_adapter::RigDrafter;

use std::sync::Arc;

use async_trait::async_trait;
use rig::client::CompletionClient;
use secrecy::ExposeSecret;

use crate::error::LlmError;
use crate::relay::Submission;

/// Default generation model.
pub const DEFAULT_MODEL: &str = "claude-haiku-4-5-20251001";

/// Default Messages API host.
pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";

/// Output cap for a drafted reply.
pub const MAX_DRAFT_TOKENS: u32 = 500;

/// Placeholder used when the generation call itself fails.
pub const DRAFT_UNAVAILABLE: &str = "(AI draft unavailable — please write your own reply)";

/// Placeholder used when the provider answers without any text.
pub const DRAFT_MISSING: &str = "(Could not generate suggested reply)";

/// Configuration for the drafting provider.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: secrecy::SecretString,
    pub model: String,
    pub base_url: String,
    pub system_prompt: String,
}

/// A candidate reply for the operator to review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftedReply {
    pub text: String,
}

impl DraftedReply {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The placeholder substituted for a failed draft.
    pub fn fallback(err: &LlmError) -> Self {
        match err {
            LlmError::EmptyResponse { .. } => Self::new(DRAFT_MISSING),
            _ => Self::new(DRAFT_UNAVAILABLE),
        }
    }
}

/// Produces a drafted reply for a submission.
#[async_trait]
pub trait Drafter: Send + Sync {
    /// Provider name, for logs.
    fn name(&self) -> &str;

    async fn draft(&self, submission: &Submission) -> Result<DraftedReply, LlmError>;
}

/// Create the production drafter from configuration.
pub fn create_drafter(config: &LlmConfig) -> Result<Arc<dyn Drafter>, LlmError> {
    create_anthropic_drafter(config)
}

fn create_anthropic_drafter(config: &LlmConfig) -> Result<Arc<dyn Drafter>, LlmError> {
    use rig::providers::anthropic;

    let client: rig::client::Client<anthropic::client::AnthropicExt> =
        anthropic::Client::builder()
            .api_key(config.api_key.expose_secret())
            .base_url(config.base_url.trim_end_matches('/'))
            .build()
            .map_err(|e| LlmError::RequestFailed {
                provider: "anthropic".to_string(),
                reason: format!("Failed to create Anthropic client: {}", e),
            })?;

    let model = client.completion_model(&config.model);
    tracing::info!("Using Anthropic (model: {})", config.model);
    Ok(Arc::new(RigDrafter::new(
        model,
        "anthropic",
        config.system_prompt.clone(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_drafter_accepts_any_key_at_construction() {
        let config = LlmConfig {
            api_key: secrecy::SecretString::from("test-key"),
            model: DEFAULT_MODEL.to_string(),
            base_url: "http://127.0.0.1:9/".to_string(),
            system_prompt: prompts::SITE_CONTEXT.to_string(),
        };
        let drafter = create_drafter(&config).unwrap();
        assert_eq!(drafter.name(), "anthropic");
    }

    #[test]
    fn empty_response_falls_back_to_missing_placeholder() {
        let err = LlmError::EmptyResponse {
            provider: "anthropic".into(),
        };
        assert_eq!(DraftedReply::fallback(&err).text, DRAFT_MISSING);
    }

    #[test]
    fn transport_failure_falls_back_to_unavailable_placeholder() {
        let err = LlmError::RequestFailed {
            provider: "anthropic".into(),
            reason: "connection refused".into(),
        };
        assert_eq!(DraftedReply::fallback(&err).text, DRAFT_UNAVAILABLE);

        let err = LlmError::InvalidResponse {
            provider: "anthropic".into(),
            reason: "expected value at line 1".into(),
        };
        assert_eq!(DraftedReply::fallback(&err).text, DRAFT_UNAVAILABLE);
    }
}
