use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend is unreachable: {0}")]
    Unreachable(String),

    #[error("backend did not answer in time")]
    Timeout,

    #[error("backend returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("backend returned a body that is not JSON: {0}")]
    Decode(String),
}

impl BackendError {
    /// Errors where no usable answer ever arrived, as opposed to an answer
    /// that could not be read.
    pub fn is_unavailable(&self) -> bool {
        !matches!(self, BackendError::Decode(_))
    }

    /// Build a status error, unwrapping Ollama's `{"error": "..."}` body when
    /// there is one.
    pub fn status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| value["error"].as_str().map(str::to_string))
            .unwrap_or_else(|| body.trim().to_string());
        BackendError::Status { status, message }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return BackendError::Timeout;
        }
        BackendError::Unreachable(err.to_string())
    }
}
