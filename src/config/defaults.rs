use super::constants::*;

pub(crate) fn log_level() -> Option<String> {
    Some("info".to_string())
}

pub(crate) fn host() -> String {
    DEFAULT_HOST.to_string()
}

pub(crate) fn port() -> u16 {
    DEFAULT_PORT
}

pub(crate) fn endpoint() -> String {
    DEFAULT_OLLAMA_ENDPOINT.to_string()
}

pub(crate) fn timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

pub(crate) fn state_file_path() -> String {
    STATE_FILE_PATH.to_string()
}
