/// Title given to conversations created without one
pub const DEFAULT_TITLE: &str = "New Chat";

/// Title of the conversation rebuilt from a flat legacy state file
pub const IMPORTED_TITLE: &str = "Imported Chat";

/// Model values older state files used to mean "not chosen yet"
pub const UNSET_MODEL_SENTINELS: &[&str] = &["", "no_model", "default"];

pub const DEFAULT_OLLAMA_ENDPOINT: &str = "http://localhost:11434";

pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

pub const DEFAULT_HOST: &str = "127.0.0.1";

pub const DEFAULT_PORT: u16 = 3000;

pub const STATE_FILE_PATH: &str = "state.json";
