use std::time::Duration;

use eyre::Result;
use serde::{Deserialize, Serialize};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(not(test))]
use std::sync::OnceLock;

use super::constants::{
    DEFAULT_HOST, DEFAULT_OLLAMA_ENDPOINT, DEFAULT_PORT, DEFAULT_TIMEOUT_SECS, STATE_FILE_PATH,
};
use super::defaults::*;

#[cfg(not(test))]
static CONFIG: OnceLock<Configuration> = OnceLock::new();

// Tests override the configuration per thread.
#[cfg(test)]
thread_local! {
    static TEST_CONFIG: RefCell<&'static Configuration> =
        RefCell::new(Box::leak(Box::new(Configuration::default())));
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct Configuration {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub chat: ChatConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct GeneralConfig {
    #[serde(default)]
    pub verbose: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LogConfig {
    #[serde(default = "log_level")]
    pub level: Option<String>,

    #[serde(default)]
    pub filters: Option<Vec<LogFilter>>,

    /// Log to this file instead of stderr
    #[serde(default)]
    pub file: Option<LogFile>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LogFilter {
    #[serde(default)]
    pub module: Option<String>,

    #[serde(default)]
    pub level: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LogFile {
    pub path: String,

    #[serde(default)]
    pub append: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ServerConfig {
    #[serde(default = "host")]
    pub host: String,

    #[serde(default = "port")]
    pub port: u16,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct BackendConfig {
    #[serde(default = "endpoint")]
    pub endpoint: String,

    #[serde(default = "timeout_secs")]
    pub timeout_secs: u64,

    /// Used when neither the request nor the conversation names a model
    #[serde(default)]
    pub default_model: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct StorageConfig {
    #[serde(default = "state_file_path")]
    pub path: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct ChatConfig {
    /// Persist a new conversation when a message arrives without a known id
    #[serde(default)]
    pub auto_create: bool,
}

impl Configuration {
    #[cfg(not(test))]
    pub fn instance() -> &'static Configuration {
        CONFIG.get().expect("Config not initialized")
    }

    #[cfg(not(test))]
    pub fn init(config: Configuration) -> Result<()> {
        CONFIG
            .set(config)
            .map_err(|_| eyre::eyre!("Config already initialized"))?;
        Ok(())
    }

    #[cfg(test)]
    pub fn instance() -> &'static Configuration {
        TEST_CONFIG.with(|config| *config.borrow())
    }

    #[cfg(test)]
    pub fn init(config: Configuration) -> Result<()> {
        TEST_CONFIG.with(|test_config| {
            *test_config.borrow_mut() = Box::leak(Box::new(config));
        });
        Ok(())
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Option<Duration> {
        if self.timeout_secs == 0 {
            return None;
        }
        Some(Duration::from_secs(self.timeout_secs))
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Some("info".to_string()),
            filters: None,
            file: None,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_OLLAMA_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            default_model: None,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: STATE_FILE_PATH.to_string(),
        }
    }
}
