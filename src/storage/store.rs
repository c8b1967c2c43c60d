#[cfg(test)]
#[path = "store_test.rs"]
mod tests;

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::models::{Conversation, ConversationPatch, ConversationSpec};

use super::{ArcStorage, StoreDocument, StoreError};

/// CRUD over conversations on top of a whole-document [`super::Storage`].
///
/// Every mutation loads the full document, changes it and writes it back.
/// Mutations are serialized through `write_lock` so two requests touching the
/// same conversation inside this process cannot lose each other's update.
/// Nothing guards against a second process writing the same file.
pub struct ConversationStore {
    storage: ArcStorage,
    write_lock: Mutex<()>,
}

pub type ArcStore = Arc<ConversationStore>;

impl ConversationStore {
    pub fn new(storage: ArcStorage) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    /// An unreadable store reads as empty for queries.
    async fn read(&self) -> StoreDocument {
        match self.storage.load().await {
            Ok(document) => document,
            Err(err) => {
                log::error!(
                    "Failed to load conversations from {} storage, using empty store: {}",
                    self.storage.name(),
                    err
                );
                StoreDocument::default()
            }
        }
    }

    /// Mutations must not save over state they could not read.
    async fn load_for_write(&self) -> Result<StoreDocument, StoreError> {
        self.storage.load().await.map_err(|err| {
            log::error!(
                "Refusing to write {} storage that failed to load: {}",
                self.storage.name(),
                err
            );
            err
        })
    }

    pub async fn create(&self, spec: ConversationSpec) -> Result<Conversation, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.load_for_write().await?;

        let mut conversation = Conversation::create(spec);
        while document.contains(conversation.id()) {
            conversation = conversation.with_id(uuid::Uuid::new_v4().to_string());
        }

        document.conversations.push(conversation.clone());
        self.storage.save(&document).await?;
        log::debug!("Created conversation {}", conversation.id());
        Ok(conversation)
    }

    pub async fn list(&self) -> Vec<Conversation> {
        self.read().await.conversations
    }

    pub async fn list_by_model(&self, model: &str) -> Vec<Conversation> {
        self.read()
            .await
            .conversations
            .into_iter()
            .filter(|c| c.model() == Some(model))
            .collect()
    }

    pub async fn get(&self, id: &str) -> Option<Conversation> {
        self.read().await.get(id).cloned()
    }

    /// Apply `patch` to the conversation `id` and persist. Returns `Ok(None)`
    /// when no such conversation exists.
    pub async fn update(
        &self,
        id: &str,
        patch: ConversationPatch,
    ) -> Result<Option<Conversation>, StoreError> {
        self.mutate(id, |conversation| conversation.apply(patch))
            .await
    }

    pub async fn clear_context(&self, id: &str) -> Result<Option<Conversation>, StoreError> {
        self.mutate(id, Conversation::clear_context).await
    }

    pub async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.load_for_write().await?;

        if document.remove(id).is_none() {
            return Ok(false);
        }

        self.storage.save(&document).await?;
        log::debug!("Deleted conversation {}", id);
        Ok(true)
    }

    async fn mutate<F>(&self, id: &str, change: F) -> Result<Option<Conversation>, StoreError>
    where
        F: FnOnce(&mut Conversation),
    {
        let _guard = self.write_lock.lock().await;
        let mut document = self.load_for_write().await?;

        let conversation = match document.get_mut(id) {
            Some(conversation) => conversation,
            None => return Ok(None),
        };
        change(conversation);
        let updated = conversation.clone();

        self.storage.save(&document).await?;
        Ok(Some(updated))
    }
}
