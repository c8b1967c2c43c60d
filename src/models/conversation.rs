#[cfg(test)]
#[path = "conversation_test.rs"]
mod tests;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::constants::{DEFAULT_TITLE, UNSET_MODEL_SENTINELS};
use crate::models::{ConversationContext, Message};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    id: String,
    #[serde(default = "default_title")]
    title: String,
    #[serde(default, deserialize_with = "deserialize_model")]
    model: Option<String>,
    #[serde(default)]
    messages: Vec<Message>,
    #[serde(default)]
    context: ConversationContext,
    #[serde(default = "Utc::now")]
    created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Build a fresh conversation from a creation request, assigning a new id.
    pub fn create(spec: ConversationSpec) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: spec
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(default_title),
            model: normalize_model(spec.model),
            messages: spec.messages.unwrap_or_default(),
            context: spec.context.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// A conversation that lives only for the duration of one request.
    pub fn ephemeral() -> Self {
        let now = Utc::now();
        Self {
            id: String::new(),
            title: default_title(),
            model: None,
            messages: vec![],
            context: ConversationContext::None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = normalize_model(Some(model.into()));
        self
    }

    pub fn with_context(mut self, context: ConversationContext) -> Self {
        self.context = context;
        self
    }

    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }

    /// Apply a partial update. `context` is merged, every other field is
    /// replaced, queued messages are appended.
    pub fn apply(&mut self, patch: ConversationPatch) {
        let ConversationPatch {
            title,
            model,
            context,
            append,
            model_if_unset,
        } = patch;

        if let Some(title) = title {
            self.title = title;
        }

        if let Some(model) = model {
            self.model = normalize_model(Some(model));
        }

        if self.model.is_none() {
            self.model = normalize_model(model_if_unset);
        }

        if let Some(context) = context {
            self.context.merge(context);
        }

        self.messages.extend(append);
        self.updated_at = Utc::now();
    }

    pub fn clear_context(&mut self) {
        self.context = ConversationContext::None;
        self.updated_at = Utc::now();
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn context(&self) -> &ConversationContext {
        &self.context
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}

/// Fields accepted when creating a conversation. Anything left out gets its
/// default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSpec {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub messages: Option<Vec<Message>>,
    #[serde(default)]
    pub context: Option<ConversationContext>,
}

impl ConversationSpec {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_context(mut self, context: ConversationContext) -> Self {
        self.context = Some(context);
        self
    }
}

/// A partial update of a conversation.
///
/// Only `title`, `model` and `context` can be set from outside. The message
/// log and the "set model if unset" rule are reserved for the chat pipeline
/// so that an exchange lands in one atomic update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub context: Option<ConversationContext>,

    #[serde(skip)]
    append: Vec<Message>,
    #[serde(skip)]
    model_if_unset: Option<String>,
}

impl ConversationPatch {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_context(mut self, context: ConversationContext) -> Self {
        self.context = Some(context);
        self
    }

    pub fn append_messages(mut self, messages: impl IntoIterator<Item = Message>) -> Self {
        self.append.extend(messages);
        self
    }

    pub fn with_model_if_unset(mut self, model: impl Into<String>) -> Self {
        self.model_if_unset = Some(model.into());
        self
    }

    pub fn appended(&self) -> &[Message] {
        &self.append
    }
}

/// Map the legacy "not configured yet" strings to `None`.
pub fn normalize_model(model: Option<String>) -> Option<String> {
    model
        .map(|m| m.trim().to_string())
        .filter(|m| !UNSET_MODEL_SENTINELS.contains(&m.as_str()))
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn deserialize_model<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let model = Option::<String>::deserialize(deserializer)?;
    Ok(normalize_model(model))
}
