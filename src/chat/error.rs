use serde::Serialize;
use thiserror::Error;

use crate::backend::BackendError;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("inference backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("inference backend returned no usable response: {0}")]
    NoValidResponse(String),
}

impl From<BackendError> for ChatError {
    fn from(err: BackendError) -> Self {
        if err.is_unavailable() {
            return ChatError::BackendUnavailable(err.to_string());
        }
        ChatError::NoValidResponse(err.to_string())
    }
}

/// Attached to a successful reply whose exchange could not be saved. The
/// caller still gets the answer; the conversation on disk does not have it.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("exchange was not saved: {detail}")]
pub struct PersistenceWarning {
    pub detail: String,
}

impl PersistenceWarning {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}
