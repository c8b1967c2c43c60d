#[cfg(test)]
#[path = "document_test.rs"]
mod tests;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::constants::IMPORTED_TITLE;
use crate::models::{Conversation, ConversationContext, ConversationSpec, Message};

const CONVERSATIONS_KEY: &str = "conversations";

/// The persisted state: every conversation, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreDocument {
    #[serde(default)]
    pub conversations: Vec<Conversation>,
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("state document must be a JSON object, got {0}")]
    NotAnObject(&'static str),
    #[error("`conversations` must be an array")]
    ConversationsNotArray,
}

impl StoreDocument {
    pub fn new(conversations: Vec<Conversation>) -> Self {
        Self { conversations }
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.conversations.iter().position(|c| c.id() == id)
    }

    pub fn get(&self, id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id() == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Conversation> {
        self.conversations.iter_mut().find(|c| c.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn remove(&mut self, id: &str) -> Option<Conversation> {
        let idx = self.position(id)?;
        Some(self.conversations.remove(idx))
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    /// Read a document from its JSON form.
    ///
    /// Records that fail to parse are skipped with a warning instead of
    /// failing the whole document. A document without a `conversations` key
    /// is the old flat key/value layout and is migrated: its `messages`
    /// (plus `context` and `model`) become a single conversation.
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        let mut map = match value {
            Value::Null => return Ok(Self::default()),
            Value::Object(map) => map,
            Value::Array(_) => return Err(DocumentError::NotAnObject("an array")),
            Value::String(_) => return Err(DocumentError::NotAnObject("a string")),
            Value::Bool(_) => return Err(DocumentError::NotAnObject("a boolean")),
            Value::Number(_) => return Err(DocumentError::NotAnObject("a number")),
        };

        if let Some(conversations) = map.remove(CONVERSATIONS_KEY) {
            if !map.is_empty() {
                log::warn!(
                    "Ignoring unrecognized state keys: {}",
                    map.keys().cloned().collect::<Vec<_>>().join(", ")
                );
            }
            return match conversations {
                Value::Array(records) => Ok(Self::new(parse_records(records))),
                Value::Null => Ok(Self::default()),
                _ => Err(DocumentError::ConversationsNotArray),
            };
        }

        if map.is_empty() {
            return Ok(Self::default());
        }

        Ok(migrate_flat(map))
    }
}

fn parse_records(records: Vec<Value>) -> Vec<Conversation> {
    records
        .into_iter()
        .enumerate()
        .filter_map(
            |(idx, record)| match serde_json::from_value::<Conversation>(record) {
                Ok(convo) => Some(convo),
                Err(err) => {
                    log::warn!("Skipping unreadable conversation record #{}: {}", idx, err);
                    None
                }
            },
        )
        .collect()
}

fn migrate_flat(mut map: serde_json::Map<String, Value>) -> StoreDocument {
    let messages = match map.remove("messages") {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(legacy_message)
            .collect::<Vec<_>>(),
        _ => vec![],
    };

    let context = map
        .remove("context")
        .map(|value| {
            ConversationContext::try_from(value).unwrap_or_else(|err| {
                log::warn!("Dropping legacy context: {}", err);
                ConversationContext::None
            })
        })
        .unwrap_or_default();

    let model = map
        .remove("model")
        .and_then(|value| value.as_str().map(str::to_string));

    if !map.is_empty() {
        log::warn!(
            "Dropping legacy state keys during migration: {}",
            map.keys().cloned().collect::<Vec<_>>().join(", ")
        );
    }

    if messages.is_empty() && context.is_empty() {
        return StoreDocument::default();
    }

    log::info!("Migrating flat state into one conversation ({} messages)", messages.len());

    let spec = ConversationSpec {
        title: Some(IMPORTED_TITLE.to_string()),
        model,
        messages: Some(messages),
        context: Some(context),
    };
    StoreDocument::new(vec![Conversation::create(spec)])
}

/// Old state files kept bare strings for user input alongside full records.
fn legacy_message(value: Value) -> Option<Message> {
    match value {
        Value::String(text) => Some(Message::new_user(text)),
        value => match serde_json::from_value::<Message>(value) {
            Ok(message) => Some(message),
            Err(err) => {
                log::warn!("Skipping unreadable legacy message: {}", err);
                None
            }
        },
    }
}
