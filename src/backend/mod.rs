pub mod error;
pub mod ollama;

pub use error::BackendError;
pub use ollama::Ollama;

#[cfg(test)]
use mockall::automock;

use crate::{
    config::BackendConfig,
    models::{BackendReply, ChatCompletionRequest, GenerateRequest, Model},
};
use async_trait::async_trait;
use eyre::{Context, Result};
use std::sync::Arc;

/// The inference service as the chat pipeline sees it: a single-prompt
/// `generate` call and a message-list `chat` call.
#[async_trait]
#[cfg_attr(test, automock)]
pub trait Backend {
    fn name(&self) -> &str;
    async fn generate(&self, request: GenerateRequest) -> Result<BackendReply, BackendError>;
    async fn chat(&self, request: ChatCompletionRequest) -> Result<BackendReply, BackendError>;
    async fn list_models(&self) -> Result<Vec<Model>, BackendError>;
}

pub type ArcBackend = Arc<dyn Backend + Send + Sync>;

pub fn new_backend(config: &BackendConfig) -> Result<ArcBackend> {
    reqwest::Url::parse(&config.endpoint)
        .wrap_err(format!("parsing backend endpoint {}", config.endpoint))?;

    let ollama = Ollama::from(config);
    log::debug!(
        "Using {} backend at {} (timeout: {:?})",
        ollama.name(),
        ollama.endpoint(),
        ollama.timeout()
    );
    Ok(Arc::new(ollama))
}
