use serde_json::json;
use crate::models::Role;

use super::*;

#[test]
fn test_create_fills_defaults() {
    let convo = Conversation::create(ConversationSpec::default());
    assert!(!convo.id().is_empty());
    assert_eq!(convo.title(), "New Chat");
    assert_eq!(convo.model(), None);
    assert!(convo.messages().is_empty());
    assert!(convo.context().is_empty());
    assert_eq!(convo.created_at(), convo.updated_at());

    let other = Conversation::create(ConversationSpec::default());
    assert_ne!(convo.id(), other.id());
}

#[test]
fn test_create_keeps_supplied_fields() {
    let spec = ConversationSpec::default()
        .with_title("Trip planning")
        .with_model("llama3");
    let convo = Conversation::create(spec);
    assert_eq!(convo.title(), "Trip planning");
    assert_eq!(convo.model(), Some("llama3"));
}

#[test]
fn test_legacy_model_sentinels_are_unset() {
    for sentinel in ["no_model", "default", "", "  "] {
        let convo: Conversation = serde_json::from_value(json!({
            "id": "1",
            "model": sentinel,
        }))
        .unwrap();
        assert_eq!(convo.model(), None, "sentinel {sentinel:?}");
    }

    let convo: Conversation = serde_json::from_value(json!({"id": "1"})).unwrap();
    assert_eq!(convo.model(), None);
    assert_eq!(convo.title(), "New Chat");
}

#[test]
fn test_apply_replaces_fields_and_merges_context() {
    let mut convo = Conversation::create(
        ConversationSpec::default()
            .with_title("old")
            .with_context(serde_json::from_value(json!({"a": 1, "b": 2})).unwrap()),
    );
    let before = convo.updated_at();

    convo.apply(
        ConversationPatch::default()
            .with_title("new")
            .with_model("mistral")
            .with_context(serde_json::from_value(json!({"b": 3, "c": 4})).unwrap()),
    );

    assert_eq!(convo.title(), "new");
    assert_eq!(convo.model(), Some("mistral"));
    assert_eq!(
        serde_json::to_value(convo.context()).unwrap(),
        json!({"a": 1, "b": 3, "c": 4})
    );
    assert!(convo.updated_at() >= before);
}

#[test]
fn test_apply_without_context_keeps_context() {
    let mut convo = Conversation::ephemeral().with_context(ConversationContext::Tokens(vec![1, 2]));
    convo.apply(ConversationPatch::default().with_title("renamed"));
    assert_eq!(convo.context(), &ConversationContext::Tokens(vec![1, 2]));
}

#[test]
fn test_model_if_unset_only_fills_empty_model() {
    let mut convo = Conversation::ephemeral();
    convo.apply(ConversationPatch::default().with_model_if_unset("llama3"));
    assert_eq!(convo.model(), Some("llama3"));

    convo.apply(ConversationPatch::default().with_model_if_unset("mistral"));
    assert_eq!(convo.model(), Some("llama3"));
}

#[test]
fn test_apply_appends_messages_in_order() {
    let mut convo = Conversation::ephemeral();
    convo.apply(ConversationPatch::default().append_messages([
        Message::new_user("hi"),
        Message::new_assistant("hello"),
    ]));
    convo.apply(ConversationPatch::default().append_messages([
        Message::new_user("how are you?"),
        Message::new_assistant("fine"),
    ]));

    let roles = convo.messages().iter().map(|m| m.role()).collect::<Vec<_>>();
    assert_eq!(
        roles,
        vec![Role::User, Role::Assistant, Role::User, Role::Assistant]
    );
    assert_eq!(convo.last_message().unwrap().content(), "fine");
}

#[test]
fn test_patch_ignores_internal_fields_from_json() {
    let patch: ConversationPatch = serde_json::from_value(json!({
        "title": "x",
        "append": [{"role": "user", "content": "sneaky"}],
        "messages": [],
    }))
    .unwrap();
    assert_eq!(patch.title.as_deref(), Some("x"));
    assert!(patch.appended().is_empty());
}

#[test]
fn test_serialized_shape_is_camel_case() {
    let convo = Conversation::ephemeral().with_id("abc").with_model("llama3");
    let value = serde_json::to_value(&convo).unwrap();
    assert_eq!(value["id"], "abc");
    assert_eq!(value["model"], "llama3");
    assert_eq!(value["context"], json!({}));
    assert!(value.get("createdAt").is_some());
    assert!(value.get("updatedAt").is_some());
}
