pub mod document;
pub mod error;
pub mod json;
pub mod memory;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use eyre::{Context, Result};

use crate::config::{StorageConfig, init_parent_dir, resolve_path};

pub use document::StoreDocument;
pub use error::StoreError;
pub use json::JsonFileStorage;
pub use memory::MemoryStorage;
pub use store::{ArcStore, ConversationStore};

/// Whole-document persistence. Implementations read and write the complete
/// state in one go; there are no partial writes.
#[async_trait]
pub trait Storage {
    fn name(&self) -> &str;
    async fn load(&self) -> Result<StoreDocument, StoreError>;
    async fn save(&self, document: &StoreDocument) -> Result<(), StoreError>;
}

pub type ArcStorage = Arc<dyn Storage + Send + Sync>;

pub fn new_storage(config: &StorageConfig) -> Result<ArcStorage> {
    let path = resolve_path(&config.path).wrap_err(format!("resolving {}", config.path))?;
    init_parent_dir(&path)?;
    Ok(Arc::new(JsonFileStorage::new(path)))
}
