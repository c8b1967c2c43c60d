#[cfg(test)]
#[path = "context_test.rs"]
mod tests;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

/// Key under which a prompt-style context stores its system prompt.
pub const SYSTEM_PROMPT_KEY: &str = "system";

/// Continuation data handed back to the inference backend on the next turn.
///
/// `Tokens` is the opaque sequence the generate endpoint returns, `Prompt` is a
/// free-form mapping (usually carrying a system prompt) used with the chat
/// endpoint.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ConversationContext {
    #[default]
    None,
    Tokens(Vec<i64>),
    Prompt(Map<String, Value>),
}

#[derive(Debug, Error, PartialEq)]
pub enum ContextError {
    #[error("context token at index {0} is not an integer")]
    InvalidToken(usize),
    #[error("context must be an object, an array of tokens or a string, got {0}")]
    UnsupportedShape(&'static str),
}

impl ConversationContext {
    pub fn is_empty(&self) -> bool {
        match self {
            ConversationContext::None => true,
            ConversationContext::Tokens(tokens) => tokens.is_empty(),
            ConversationContext::Prompt(map) => map.is_empty(),
        }
    }

    pub fn tokens(&self) -> Option<&[i64]> {
        match self {
            ConversationContext::Tokens(tokens) => Some(tokens),
            _ => None,
        }
    }

    /// Merge an incoming context into this one.
    ///
    /// Two mappings are merged key by key with the incoming side winning. A
    /// token sequence has no keys, so incoming tokens replace whatever was
    /// there. An empty incoming context leaves the current one untouched.
    pub fn merge(&mut self, incoming: ConversationContext) {
        if incoming.is_empty() {
            return;
        }

        match (self, incoming) {
            (ConversationContext::Prompt(current), ConversationContext::Prompt(incoming)) => {
                for (key, value) in incoming {
                    current.insert(key, value);
                }
            }
            (current, incoming) => *current = incoming,
        }
    }

    /// The text sent as the system message when this context drives a chat
    /// call. Falls back to the whole mapping rendered as JSON when no
    /// `system` string is present.
    pub fn system_prompt(&self) -> Option<String> {
        let map = match self {
            ConversationContext::Prompt(map) if !map.is_empty() => map,
            _ => return None,
        };

        if let Some(Value::String(prompt)) = map.get(SYSTEM_PROMPT_KEY) {
            return Some(prompt.clone());
        }
        Some(Value::Object(map.clone()).to_string())
    }
}

impl TryFrom<Value> for ConversationContext {
    type Error = ContextError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(ConversationContext::None),
            Value::Array(items) => {
                if items.is_empty() {
                    return Ok(ConversationContext::None);
                }
                let tokens = items
                    .iter()
                    .enumerate()
                    .map(|(idx, item)| item.as_i64().ok_or(ContextError::InvalidToken(idx)))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(ConversationContext::Tokens(tokens))
            }
            Value::Object(map) => {
                if map.is_empty() {
                    return Ok(ConversationContext::None);
                }
                Ok(ConversationContext::Prompt(map))
            }
            Value::String(prompt) => {
                if prompt.is_empty() {
                    return Ok(ConversationContext::None);
                }
                let mut map = Map::new();
                map.insert(SYSTEM_PROMPT_KEY.to_string(), Value::String(prompt));
                Ok(ConversationContext::Prompt(map))
            }
            Value::Bool(_) => Err(ContextError::UnsupportedShape("a boolean")),
            Value::Number(_) => Err(ContextError::UnsupportedShape("a number")),
        }
    }
}

impl From<&ConversationContext> for Value {
    fn from(value: &ConversationContext) -> Self {
        match value {
            ConversationContext::None => Value::Object(Map::new()),
            ConversationContext::Tokens(tokens) => {
                Value::Array(tokens.iter().map(|t| Value::from(*t)).collect())
            }
            ConversationContext::Prompt(map) => Value::Object(map.clone()),
        }
    }
}

impl Serialize for ConversationContext {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Value::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ConversationContext {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        ConversationContext::try_from(value).map_err(serde::de::Error::custom)
    }
}
