use serde_json::json;

use super::*;

fn reply(value: serde_json::Value) -> BackendReply {
    BackendReply::from(&value)
}

#[test]
fn test_normalize_top_level_response() {
    let text = normalize_reply(&reply(json!({"response": "hi"}))).unwrap();
    assert_eq!(text, "hi");
}

#[test]
fn test_normalize_nested_message_content() {
    let text = normalize_reply(&reply(json!({"message": {"content": "hi"}}))).unwrap();
    assert_eq!(text, "hi");
}

#[test]
fn test_normalize_prefers_response() {
    let text = normalize_reply(&reply(json!({
        "response": "top",
        "message": {"content": "nested"},
    })))
    .unwrap();
    assert_eq!(text, "top");

    let text = normalize_reply(&reply(json!({
        "response": "",
        "message": {"content": "nested"},
    })))
    .unwrap();
    assert_eq!(text, "nested");
}

#[test]
fn test_normalize_empty_payload_fails() {
    let err = normalize_reply(&reply(json!({}))).unwrap_err();
    assert!(matches!(err, ChatError::NoValidResponse(_)));

    let err = normalize_reply(&reply(json!({"response": 42, "message": "hi"}))).unwrap_err();
    assert!(matches!(err, ChatError::NoValidResponse(_)));
}

#[test]
fn test_select_mode() {
    assert_eq!(
        InferenceMode::select(&ConversationContext::None),
        InferenceMode::Stateless
    );
    assert_eq!(
        InferenceMode::select(&ConversationContext::Tokens(vec![])),
        InferenceMode::Stateless
    );

    let mode = InferenceMode::select(&ConversationContext::Tokens(vec![7, 8]));
    assert_eq!(mode, InferenceMode::ContinueTokens(vec![7, 8]));
    assert!(mode.is_contextual());

    let ctx: ConversationContext = serde_json::from_value(json!({"system": "Be terse."})).unwrap();
    assert_eq!(
        InferenceMode::select(&ctx),
        InferenceMode::SystemPrompt("Be terse.".to_string())
    );
    assert!(!InferenceMode::Stateless.is_contextual());
}

#[test]
fn test_normalize_empty_response_without_message() {
    let text = normalize_reply(&reply(json!({"response": "", "done": true}))).unwrap();
    assert_eq!(text, "");
}
