use serde_json::json;

use super::*;

fn prompt(value: Value) -> ConversationContext {
    ConversationContext::try_from(value).expect("valid context")
}

#[test]
fn test_merge_prompt_keeps_old_keys_and_overwrites_overlap() {
    let mut ctx = prompt(json!({"a": 1, "b": 2}));
    ctx.merge(prompt(json!({"b": 3, "c": 4})));
    assert_eq!(ctx, prompt(json!({"a": 1, "b": 3, "c": 4})));
}

#[test]
fn test_merge_empty_incoming_is_noop() {
    let mut ctx = prompt(json!({"a": 1}));
    ctx.merge(ConversationContext::None);
    ctx.merge(ConversationContext::Tokens(vec![]));
    assert_eq!(ctx, prompt(json!({"a": 1})));
}

#[test]
fn test_merge_tokens_replace() {
    let mut ctx = ConversationContext::Tokens(vec![1, 2, 3]);
    ctx.merge(ConversationContext::Tokens(vec![4, 5]));
    assert_eq!(ctx, ConversationContext::Tokens(vec![4, 5]));

    let mut ctx = prompt(json!({"system": "be brief"}));
    ctx.merge(ConversationContext::Tokens(vec![9]));
    assert_eq!(ctx.tokens(), Some(&[9][..]));

    let mut ctx = ConversationContext::None;
    ctx.merge(prompt(json!({"system": "be brief"})));
    assert_eq!(ctx.system_prompt().as_deref(), Some("be brief"));
}

#[test]
fn test_deserialize_shapes() {
    let ctx: ConversationContext = serde_json::from_value(json!(null)).unwrap();
    assert_eq!(ctx, ConversationContext::None);

    let ctx: ConversationContext = serde_json::from_value(json!({})).unwrap();
    assert_eq!(ctx, ConversationContext::None);

    let ctx: ConversationContext = serde_json::from_value(json!([])).unwrap();
    assert_eq!(ctx, ConversationContext::None);

    let ctx: ConversationContext = serde_json::from_value(json!([10, 20, 30])).unwrap();
    assert_eq!(ctx, ConversationContext::Tokens(vec![10, 20, 30]));

    let ctx: ConversationContext = serde_json::from_value(json!("You are a cat.")).unwrap();
    assert_eq!(ctx.system_prompt().as_deref(), Some("You are a cat."));

    let err = serde_json::from_value::<ConversationContext>(json!([1, "two"])).unwrap_err();
    assert!(err.to_string().contains("index 1"));

    assert_eq!(
        ConversationContext::try_from(json!(true)),
        Err(ContextError::UnsupportedShape("a boolean"))
    );
}

#[test]
fn test_serialize_none_as_empty_object() {
    let value = serde_json::to_value(ConversationContext::None).unwrap();
    assert_eq!(value, json!({}));

    let value = serde_json::to_value(ConversationContext::Tokens(vec![1, 2])).unwrap();
    assert_eq!(value, json!([1, 2]));
}

#[test]
fn test_system_prompt_falls_back_to_json() {
    let ctx = prompt(json!({"persona": "pirate"}));
    assert_eq!(ctx.system_prompt().as_deref(), Some(r#"{"persona":"pirate"}"#));

    assert_eq!(ConversationContext::Tokens(vec![1]).system_prompt(), None);
    assert_eq!(ConversationContext::None.system_prompt(), None);
}
