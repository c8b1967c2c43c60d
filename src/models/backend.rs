use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{Message, Role};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    modified_at: Option<String>,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: None,
            modified_at: None,
        }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_modified_at(mut self, modified_at: impl Into<String>) -> Self {
        self.modified_at = Some(modified_at.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> Option<u64> {
        self.size
    }

    pub fn modified_at(&self) -> Option<&str> {
        self.modified_at.as_deref()
    }
}

/// A single-prompt completion, optionally continuing from earlier tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    model: String,
    prompt: String,
    context: Option<Vec<i64>>,
}

impl GenerateRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            context: None,
        }
    }

    pub fn with_context(mut self, tokens: Vec<i64>) -> Self {
        self.context = Some(tokens);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn context(&self) -> Option<&[i64]> {
        self.context.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

impl From<&Message> for ChatTurn {
    fn from(value: &Message) -> Self {
        Self::new(value.role(), value.content())
    }
}

/// A message-list completion against the chat endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatTurn>,
}

impl ChatCompletionRequest {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![],
        }
    }

    pub fn with_message(mut self, role: Role, content: impl Into<String>) -> Self {
        self.messages.push(ChatTurn::new(role, content));
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn messages(&self) -> &[ChatTurn] {
        &self.messages
    }
}

/// What the backend sent back, read leniently. Which of the fields carries
/// the answer depends on the endpoint and the server version, so nothing
/// here is required.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackendReply {
    pub response: Option<String>,
    pub message_content: Option<String>,
    pub context: Option<Vec<i64>>,
}

impl BackendReply {
    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.response = Some(response.into());
        self
    }

    pub fn with_message_content(mut self, content: impl Into<String>) -> Self {
        self.message_content = Some(content.into());
        self
    }

    pub fn with_context(mut self, tokens: Vec<i64>) -> Self {
        self.context = Some(tokens);
        self
    }
}

impl From<&Value> for BackendReply {
    fn from(value: &Value) -> Self {
        let context = value["context"].as_array().and_then(|tokens| {
            tokens
                .iter()
                .map(Value::as_i64)
                .collect::<Option<Vec<_>>>()
        });

        Self {
            response: value["response"].as_str().map(str::to_string),
            message_content: value["message"]["content"].as_str().map(str::to_string),
            context,
        }
    }
}
