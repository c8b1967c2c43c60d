pub mod error;
pub mod normalize;
pub mod service;

pub use error::{ChatError, PersistenceWarning};
pub use normalize::{InferenceMode, normalize_reply};
pub use service::{ArcChatService, ChatReply, ChatRequest, ChatService};
