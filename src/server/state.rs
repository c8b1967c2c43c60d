use crate::backend::ArcBackend;
use crate::chat::ArcChatService;
use crate::storage::ArcStore;

/// Shared by every handler. Cloning only bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    pub store: ArcStore,
    pub chat: ArcChatService,
    pub backend: ArcBackend,
}

impl AppState {
    pub fn new(store: ArcStore, chat: ArcChatService, backend: ArcBackend) -> Self {
        Self {
            store,
            chat,
            backend,
        }
    }
}
