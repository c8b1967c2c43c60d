use crate::config::constants::{
    DEFAULT_HOST, DEFAULT_OLLAMA_ENDPOINT, DEFAULT_PORT, DEFAULT_TIMEOUT_SECS, STATE_FILE_PATH,
};

use super::*;

#[test]
fn test_load_configuration() {
    let config = load_configuration("./testdata/config.toml").expect("failed to load config");

    assert_eq!(config.general.verbose, true);

    let log = &config.log;
    assert_eq!(log.level.as_deref(), Some("info"));
    let log_filters = log.filters.as_deref().unwrap_or_default();
    assert_eq!(log_filters.len(), 1);
    assert_eq!(log_filters[0].module.as_deref(), Some("ollama_chat::backend"));
    assert_eq!(log_filters[0].level.as_deref(), Some("debug"));

    let log_file = log.file.as_ref().expect("log file configured");
    assert_eq!(log_file.path, "/var/log/ollama-chat.log");
    assert_eq!(log_file.append, true);

    assert_eq!(config.server.address(), "0.0.0.0:8080");

    let backend = &config.backend;
    assert_eq!(backend.endpoint, "http://10.0.0.5:11434");
    assert_eq!(backend.timeout(), Some(std::time::Duration::from_secs(60)));
    assert_eq!(backend.default_model.as_deref(), Some("llama3"));

    assert_eq!(config.storage.path, "/var/lib/ollama-chat/state.json");
    assert_eq!(config.chat.auto_create, true);
}

#[test]
fn test_load_configuration_with_some_default_fields() {
    let config =
        load_configuration("./testdata/config_with_default.toml").expect("failed to load config");

    assert_eq!(config.general.verbose, false);
    assert_eq!(config.log.level.as_deref(), Some("info"));
    assert!(config.log.file.is_none());

    assert_eq!(config.server.host, DEFAULT_HOST);
    assert_eq!(config.server.port, DEFAULT_PORT);

    assert_eq!(config.backend.endpoint, DEFAULT_OLLAMA_ENDPOINT);
    assert_eq!(config.backend.timeout_secs, DEFAULT_TIMEOUT_SECS);
    assert_eq!(config.backend.default_model.as_deref(), Some("mistral"));

    assert_eq!(config.storage.path, STATE_FILE_PATH);
    assert_eq!(config.chat.auto_create, false);
}

#[test]
fn test_zero_timeout_disables_timeout() {
    let mut config = Configuration::default();
    config.backend.timeout_secs = 0;
    assert_eq!(config.backend.timeout(), None);
}

#[test]
fn test_resolve_path() {
    let ret = resolve_path("$OC_TEST_PATH/${OC_USER_PATH}/state.json")
        .expect("failed to resolve path");
    assert_eq!(ret, "//state.json");

    let dir = "/tmp/test";
    let user_path = "user_path";
    unsafe {
        std::env::set_var("OC_TEST_PATH", dir);
        std::env::set_var("OC_USER_PATH", user_path);
    }
    let ret = resolve_path("$OC_TEST_PATH/${OC_USER_PATH}/state.json")
        .expect("failed to resolve path");
    assert_eq!(ret, format!("{dir}/{user_path}/state.json"));
}

#[test]
fn test_basename() {
    assert_eq!(basename("src/chat/mod.rs"), "mod.rs");
    assert_eq!(basename("main.rs"), "main.rs");
}

#[test]
fn test_version_and_user_agent() {
    let version = crate::config::version();
    assert!(version.starts_with("ollama-chat version: "));
    assert!(version.contains(crate::config::VERSION));
    assert_eq!(
        crate::config::user_agent(),
        format!("ollama-chat/{}", crate::config::VERSION)
    );
}

#[test]
fn test_init_overrides_instance() {
    let mut config = Configuration::default();
    config.general.verbose = true;
    config.server.port = 4242;
    Configuration::init(config).unwrap();

    let instance = Configuration::instance();
    assert!(instance.general.verbose);
    assert_eq!(instance.server.port, 4242);
}
