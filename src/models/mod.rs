pub mod backend;
pub mod context;
pub mod conversation;
pub mod message;

pub use backend::*;
pub use context::{ContextError, ConversationContext};
pub use conversation::{Conversation, ConversationPatch, ConversationSpec};
pub use message::{Message, Role};
