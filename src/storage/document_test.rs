use serde_json::json;

use super::*;
use crate::models::Role;

#[test]
fn test_from_value_reads_conversations() {
    let doc = StoreDocument::from_value(json!({
        "conversations": [
            {"id": "1", "title": "first", "model": "llama3", "messages": [], "context": {}},
            {"id": "2", "title": "second", "model": "no_model", "messages": [], "context": [1, 2]},
        ]
    }))
    .expect("valid document");

    assert_eq!(doc.len(), 2);
    assert_eq!(doc.conversations[0].id(), "1");
    assert_eq!(doc.conversations[1].id(), "2");
    assert_eq!(doc.conversations[1].model(), None);
    assert_eq!(
        doc.get("2").unwrap().context(),
        &ConversationContext::Tokens(vec![1, 2])
    );
}

#[test]
fn test_from_value_skips_broken_records() {
    let doc = StoreDocument::from_value(json!({
        "conversations": [
            {"id": "1"},
            {"title": "no id"},
            {"id": "3", "messages": "not a list"},
        ]
    }))
    .expect("valid document");

    assert_eq!(doc.len(), 1);
    assert!(doc.contains("1"));
}

#[test]
fn test_from_value_empty_shapes() {
    assert!(StoreDocument::from_value(json!(null)).unwrap().is_empty());
    assert!(StoreDocument::from_value(json!({})).unwrap().is_empty());
    assert!(
        StoreDocument::from_value(json!({"conversations": null}))
            .unwrap()
            .is_empty()
    );
}

#[test]
fn test_from_value_rejects_non_objects() {
    assert!(matches!(
        StoreDocument::from_value(json!([1, 2])),
        Err(DocumentError::NotAnObject("an array"))
    ));
    assert!(matches!(
        StoreDocument::from_value(json!({"conversations": {}})),
        Err(DocumentError::ConversationsNotArray)
    ));
}

#[test]
fn test_migrates_flat_document() {
    let doc = StoreDocument::from_value(json!({
        "messages": [
            "hello there",
            {"role": "assistant", "content": "hi!", "timestamp": "2024-01-01T00:00:00Z"},
        ],
        "context": [3, 4, 5],
        "model": "llama3",
        "theme": "dark",
    }))
    .expect("valid document");

    assert_eq!(doc.len(), 1);
    let convo = &doc.conversations[0];
    assert_eq!(convo.title(), "Imported Chat");
    assert_eq!(convo.model(), Some("llama3"));
    assert_eq!(convo.context(), &ConversationContext::Tokens(vec![3, 4, 5]));
    assert_eq!(convo.messages().len(), 2);
    assert_eq!(convo.messages()[0].role(), Role::User);
    assert_eq!(convo.messages()[0].content(), "hello there");
    assert_eq!(convo.messages()[1].role(), Role::Assistant);
}

#[test]
fn test_flat_document_without_history_is_empty() {
    let doc = StoreDocument::from_value(json!({"context": "", "theme": "dark"})).unwrap();
    assert!(doc.is_empty());
}

#[test]
fn test_remove() {
    let mut doc = StoreDocument::new(vec![
        Conversation::ephemeral().with_id("a"),
        Conversation::ephemeral().with_id("b"),
    ]);
    assert_eq!(doc.remove("a").map(|c| c.id().to_string()), Some("a".to_string()));
    assert!(doc.remove("a").is_none());
    assert_eq!(doc.len(), 1);
}
