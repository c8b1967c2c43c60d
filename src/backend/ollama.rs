#[cfg(test)]
#[path = "ollama_test.rs"]
mod tests;

use std::time;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::backend::{Backend, BackendError};
use crate::config::constants::DEFAULT_OLLAMA_ENDPOINT;
use crate::config::{BackendConfig, user_agent};
use crate::models::{BackendReply, ChatCompletionRequest, ChatTurn, GenerateRequest, Model};

pub struct Ollama {
    alias: String,
    endpoint: String,
    timeout: Option<time::Duration>,
    client: reqwest::Client,
}

#[async_trait]
impl Backend for Ollama {
    fn name(&self) -> &str {
        &self.alias
    }

    async fn generate(&self, request: GenerateRequest) -> Result<BackendReply, BackendError> {
        let body = GenerateBody {
            model: request.model(),
            prompt: request.prompt(),
            stream: false,
            context: request.context(),
        };
        let value = self.post("/api/generate", &body).await?;
        Ok(BackendReply::from(&value))
    }

    async fn chat(&self, request: ChatCompletionRequest) -> Result<BackendReply, BackendError> {
        let body = ChatBody {
            model: request.model(),
            messages: request.messages(),
            stream: false,
        };
        let value = self.post("/api/chat", &body).await?;
        Ok(BackendReply::from(&value))
    }

    async fn list_models(&self) -> Result<Vec<Model>, BackendError> {
        let mut req = self
            .client
            .get(self.url("/api/tags"))
            .header("User-Agent", user_agent());

        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }

        let res = req.send().await?;
        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(BackendError::status(status, &body));
        }

        let body = res.text().await?;
        let tags = serde_json::from_str::<TagsResponse>(&body)
            .map_err(|err| BackendError::Decode(err.to_string()))?;

        let mut models = tags
            .models
            .into_iter()
            .map(Model::from)
            .collect::<Vec<_>>();
        models.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(models)
    }
}

impl From<&BackendConfig> for Ollama {
    fn from(value: &BackendConfig) -> Self {
        let mut ollama = Ollama::default().with_endpoint(&value.endpoint);
        ollama.timeout = value.timeout();
        ollama
    }
}

impl Ollama {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: time::Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Option<time::Duration> {
        self.timeout
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    async fn post<T: Serialize + ?Sized + Sync>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<Value, BackendError> {
        let mut req = self
            .client
            .post(self.url(path))
            .header("Content-Type", "application/json")
            .header("User-Agent", user_agent());

        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }

        log::trace!(
            "Sending request to {}: {}",
            path,
            serde_json::to_string(body).unwrap_or_default()
        );

        let res = req.json(body).send().await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            log::error!("Error response from {} ({}): {}", path, status, body);
            return Err(BackendError::status(status, &body));
        }

        let body = res.text().await?;
        log::trace!("Response from {}: {}", path, body);
        serde_json::from_str::<Value>(&body).map_err(|err| BackendError::Decode(err.to_string()))
    }
}

impl Default for Ollama {
    fn default() -> Self {
        Self {
            alias: "Ollama".to_string(),
            endpoint: DEFAULT_OLLAMA_ENDPOINT.to_string(),
            timeout: None,
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateBody<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<&'a [i64]>,
}

#[derive(Debug, Serialize)]
struct ChatBody<'a> {
    model: &'a str,
    messages: &'a [ChatTurn],
    stream: bool,
}

#[derive(Default, Debug, Serialize, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagResponse>,
}

#[derive(Default, Debug, Serialize, Deserialize)]
struct TagResponse {
    name: String,
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    modified_at: Option<String>,
}

impl From<TagResponse> for Model {
    fn from(value: TagResponse) -> Self {
        let mut model = Model::new(value.name);
        if let Some(size) = value.size {
            model = model.with_size(size);
        }
        if let Some(modified_at) = value.modified_at {
            model = model.with_modified_at(modified_at);
        }
        model
    }
}
