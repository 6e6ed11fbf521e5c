//! Bridges a rig-core `CompletionModel` to the `Drafter` trait.

use async_trait::async_trait;
use rig::OneOrMany;
use rig::completion::{AssistantContent, CompletionError, CompletionModel};

use super::{DraftedReply, Drafter, MAX_DRAFT_TOKENS, prompts};
use crate::error::LlmError;
use crate::relay::Submission;

/// Drafts replies with a single completion request against any rig model.
pub struct RigDrafter<M> {
    model: M,
    provider: &'static str,
    system_prompt: String,
}

impl<M: CompletionModel> RigDrafter<M> {
    pub fn new(model: M, provider: &'static str, system_prompt: impl Into<String>) -> Self {
        Self {
            model,
            provider,
            system_prompt: system_prompt.into(),
        }
    }
}

#[async_trait]
impl<M> Drafter for RigDrafter<M>
where
    M: CompletionModel + 'static,
{
    fn name(&self) -> &str {
        self.provider
    }

    async fn draft(&self, submission: &Submission) -> Result<DraftedReply, LlmError> {
        let response = self
            .model
            .completion_request(prompts::draft_request(submission))
            .preamble(self.system_prompt.clone())
            .max_tokens(u64::from(MAX_DRAFT_TOKENS))
            .send()
            .await
            .map_err(|e| map_completion_error(self.provider, e))?;

        first_text(&response.choice)
            .map(DraftedReply::new)
            .ok_or_else(|| LlmError::EmptyResponse {
                provider: self.provider.into(),
            })
    }
}

/// The first text block of a completion, if it has any characters.
fn first_text(choice: &OneOrMany<AssistantContent>) -> Option<String> {
    choice
        .iter()
        .find_map(|content| match content {
            AssistantContent::Text(text) => Some(text.text.clone()),
            _ => None,
        })
        .filter(|text| !text.is_empty())
}

/// Classify rig errors so the relay can pick the right placeholder.
///
/// rig reports a decodable response without usable content as
/// `ResponseError`; that is the "no text" case, not a failed call.
fn map_completion_error(provider: &str, err: CompletionError) -> LlmError {
    match err {
        CompletionError::ResponseError(_) => LlmError::EmptyResponse {
            provider: provider.into(),
        },
        CompletionError::JsonError(e) => LlmError::InvalidResponse {
            provider: provider.into(),
            reason: e.to_string(),
        },
        other => LlmError::RequestFailed {
            provider: provider.into(),
            reason: other.to_string(),
        },
    }
}
