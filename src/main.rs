use std::sync::Arc;

use eyre::{Context, Result};
use ollama_chat::backend::new_backend;
use ollama_chat::chat::ChatService;
use ollama_chat::cli::Command;
use ollama_chat::config::{Configuration, init_logger, verbose};
use ollama_chat::server::{self, AppState};
use ollama_chat::storage::{ConversationStore, new_storage};

#[tokio::main]
async fn main() -> Result<()> {
    let cmd = Command::new();
    if cmd.version() {
        cmd.print_version();
        return Ok(());
    }

    better_panic::install();

    let config = cmd.get_config()?;
    init_logger(&config.log)?;
    Configuration::init(config.clone())?;
    verbose!("[+] Logger initialized");

    verbose!("[+] Initializing storage...");
    let storage = new_storage(&config.storage).wrap_err("initializing storage")?;
    let store = Arc::new(ConversationStore::new(storage));
    verbose!("[+] Storage initialized ({})", config.storage.path);

    verbose!("[+] Initializing backend...");
    let backend = new_backend(&config.backend).wrap_err("initializing backend")?;
    if config.backend.default_model.is_none() {
        verbose!("[!] No default model configured, requests must name one");
    }

    let chat = ChatService::new(store.clone(), backend.clone())
        .with_default_model(config.backend.default_model.clone())
        .with_auto_create(config.chat.auto_create);

    let state = AppState::new(store, Arc::new(chat), backend);
    verbose!("[+] Serving on {}", config.server.address());
    server::serve(&config.server, state).await
}
