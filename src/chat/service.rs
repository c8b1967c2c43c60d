#[cfg(test)]
#[path = "service_test.rs"]
mod tests;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::backend::ArcBackend;
use crate::chat::{ChatError, InferenceMode, PersistenceWarning, normalize_reply};
use crate::models::conversation::normalize_model;
use crate::models::{
    BackendReply, ChatCompletionRequest, Conversation, ConversationContext, ConversationPatch,
    ConversationSpec, GenerateRequest, Message, Role,
};
use crate::storage::ArcStore;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_conversation(mut self, id: impl Into<String>) -> Self {
        self.conversation_id = Some(id.into());
        self
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub response: String,
    pub message: Message,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<PersistenceWarning>,
}

pub struct ChatService {
    store: ArcStore,
    backend: ArcBackend,
    default_model: Option<String>,
    auto_create: bool,
}

pub type ArcChatService = Arc<ChatService>;

impl ChatService {
    pub fn new(store: ArcStore, backend: ArcBackend) -> Self {
        Self {
            store,
            backend,
            default_model: None,
            auto_create: false,
        }
    }

    pub fn with_default_model(mut self, model: Option<String>) -> Self {
        self.default_model = normalize_model(model);
        self
    }

    pub fn with_auto_create(mut self, auto_create: bool) -> Self {
        self.auto_create = auto_create;
        self
    }

    /// Run one exchange: a single backend call, then at most one write.
    ///
    /// Nothing is written unless the backend produced a usable answer.
    pub async fn send(&self, request: ChatRequest) -> Result<ChatReply, ChatError> {
        let prompt = match request.message {
            Some(text) if !text.trim().is_empty() => text,
            _ => return Err(ChatError::Validation("message must not be empty".to_string())),
        };

        let (conversation, persisted) = self.resolve(request.conversation_id.as_deref()).await;
        let model = self.resolve_model(request.model, &conversation)?;

        let mode = InferenceMode::select(conversation.context());
        log::debug!(
            "Sending to {} with model {} ({:?})",
            self.backend.name(),
            model,
            mode
        );
        let reply = self.infer(&model, &prompt, mode).await.map_err(|err| {
            log::error!("Backend call failed: {}", err);
            err
        })?;
        let text = normalize_reply(&reply)?;

        let user = Message::new_user(prompt);
        let assistant = Message::new_assistant(&text);
        let tokens = reply.context.filter(|tokens| !tokens.is_empty());

        let mut chat_reply = ChatReply {
            response: text,
            message: assistant.clone(),
            conversation_id: None,
            warning: None,
        };

        if persisted {
            let mut patch = ConversationPatch::default()
                .append_messages([user, assistant])
                .with_model_if_unset(&model);
            if let Some(tokens) = tokens {
                patch = patch.with_context(ConversationContext::Tokens(tokens));
            }

            chat_reply.conversation_id = Some(conversation.id().to_string());
            match self.store.update(conversation.id(), patch).await {
                Ok(Some(_)) => {}
                Ok(None) => {
                    log::warn!(
                        "Conversation {} disappeared before the exchange was saved",
                        conversation.id()
                    );
                    chat_reply.warning = Some(PersistenceWarning::new(format!(
                        "conversation {} no longer exists",
                        conversation.id()
                    )));
                }
                Err(err) => {
                    log::warn!(
                        "Failed to save exchange for conversation {}: {}",
                        conversation.id(),
                        err
                    );
                    chat_reply.warning = Some(PersistenceWarning::new(err.to_string()));
                }
            }
        } else if self.auto_create {
            let spec = ConversationSpec {
                model: Some(model),
                messages: Some(vec![user, assistant]),
                context: tokens.map(ConversationContext::Tokens),
                ..Default::default()
            };
            match self.store.create(spec).await {
                Ok(created) => chat_reply.conversation_id = Some(created.id().to_string()),
                Err(err) => {
                    log::warn!("Failed to create conversation for exchange: {}", err);
                    chat_reply.warning = Some(PersistenceWarning::new(err.to_string()));
                }
            }
        }

        Ok(chat_reply)
    }

    /// Look the conversation up. `false` means the exchange runs against an
    /// ephemeral conversation.
    async fn resolve(&self, id: Option<&str>) -> (Conversation, bool) {
        let Some(id) = id.filter(|id| !id.trim().is_empty()) else {
            return (Conversation::ephemeral(), false);
        };

        match self.store.get(id).await {
            Some(conversation) => (conversation, true),
            None => {
                log::warn!("Conversation {} not found, answering without history", id);
                (Conversation::ephemeral(), false)
            }
        }
    }

    fn resolve_model(
        &self,
        requested: Option<String>,
        conversation: &Conversation,
    ) -> Result<String, ChatError> {
        normalize_model(requested)
            .or_else(|| conversation.model().map(str::to_string))
            .or_else(|| self.default_model.clone())
            .ok_or_else(|| {
                ChatError::Validation(
                    "no model given and none configured for this conversation".to_string(),
                )
            })
    }

    async fn infer(
        &self,
        model: &str,
        prompt: &str,
        mode: InferenceMode,
    ) -> Result<BackendReply, ChatError> {
        let reply = match mode {
            InferenceMode::Stateless => {
                self.backend
                    .generate(GenerateRequest::new(model, prompt))
                    .await?
            }
            InferenceMode::ContinueTokens(tokens) => {
                self.backend
                    .generate(GenerateRequest::new(model, prompt).with_context(tokens))
                    .await?
            }
            InferenceMode::SystemPrompt(system) => {
                let request = ChatCompletionRequest::new(model)
                    .with_message(Role::System, system)
                    .with_message(Role::User, prompt);
                self.backend.chat(request).await?
            }
        };
        Ok(reply)
    }
}
