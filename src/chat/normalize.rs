#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;

use crate::chat::ChatError;
use crate::models::{BackendReply, ConversationContext};

/// Which backend call a turn goes through.
///
/// `Stateless` is used while a conversation has no context. The other two
/// are the contextual calls: continuing from generate tokens, or a chat call
/// led by a system prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceMode {
    Stateless,
    ContinueTokens(Vec<i64>),
    SystemPrompt(String),
}

impl InferenceMode {
    pub fn select(context: &ConversationContext) -> Self {
        match context {
            ConversationContext::Tokens(tokens) if !tokens.is_empty() => {
                InferenceMode::ContinueTokens(tokens.clone())
            }
            ConversationContext::Prompt(_) => match context.system_prompt() {
                Some(prompt) => InferenceMode::SystemPrompt(prompt),
                None => InferenceMode::Stateless,
            },
            _ => InferenceMode::Stateless,
        }
    }

    pub fn is_contextual(&self) -> bool {
        !matches!(self, InferenceMode::Stateless)
    }
}

/// Pull the answer text out of a backend reply: the top-level `response`
/// first, then `message.content`. An empty `response` string counts as
/// missing when `message.content` is present, and is returned as-is when it
/// is not. A reply with neither field is an error.
pub fn normalize_reply(reply: &BackendReply) -> Result<String, ChatError> {
    match (reply.response.as_deref(), reply.message_content.as_deref()) {
        (Some(text), _) if !text.is_empty() => Ok(text.to_string()),
        (_, Some(text)) => Ok(text.to_string()),
        (Some(text), None) => Ok(text.to_string()),
        (None, None) => Err(ChatError::NoValidResponse(
            "reply has neither `response` nor `message.content`".to_string(),
        )),
    }
}
