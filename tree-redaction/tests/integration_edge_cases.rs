//! Edge-case coverage for traversal, matching and the text boundary.
//!
//! These tests focus on boundary shapes: empty containers, leaf roots, very
//! deep or very wide trees, holes left by earlier removals, and patterns that
//! look like they should match but do not.

use serde_json::json;
use tree_redaction::{
    redact, redact_json, redact_text, try_redact_text, Document, Key, Mode, RedactError,
    RedactOptions, Value,
};

#[test]
fn test_empty_containers() {
    let options = RedactOptions::new().with_auto_detect(true);
    assert_eq!(redact_json(json!({}), &options).unwrap(), json!({}));
    assert_eq!(redact_json(json!([]), &options).unwrap(), json!([]));
}

#[test]
fn test_scalar_roots_pass_through() {
    let options = RedactOptions::new().with_paths([""]).with_auto_detect(true);
    for json in [json!(null), json!(true), json!(1.5), json!("password")] {
        assert_eq!(redact_json(json.clone(), &options).unwrap(), json);
    }
}

#[test]
fn test_root_is_never_redacted() {
    let options = RedactOptions::new()
        .with_paths([""])
        .with_preserve_types(true);
    let out = redact_json(json!({"a": 1}), &options).unwrap();
    assert_eq!(out, json!({"a": 1}));
}

#[test]
fn test_wildcard_does_not_span_segments() {
    let options = RedactOptions::new().with_paths(["a.*"]);
    let out = redact_json(json!({"a": {"b": {"c": 1}}, "x": {"a": 2}}), &options).unwrap();
    assert_eq!(out, json!({"a": {"b": "********"}, "x": {"a": 2}}));
}

#[test]
fn test_partial_wildcard_is_literal() {
    let options = RedactOptions::new().with_paths(["us*"]);
    let out = redact_json(json!({"user": 1, "us*": 2}), &options).unwrap();
    assert_eq!(out, json!({"user": 1, "us*": "********"}));
}

#[test]
fn test_numeric_segments_address_list_items() {
    let options = RedactOptions::new().with_paths(["0.token", "1"]);
    let out = redact_json(json!([{"token": "a"}, "b", "c"]), &options).unwrap();
    assert_eq!(out, json!([{"token": "********"}, "********", "c"]));
}

#[test]
fn test_keys_containing_dots() {
    // The path of "a.b" is indistinguishable from the nested path a -> b.
    let options = RedactOptions::new().with_paths(["a.b"]);
    let out = redact_json(json!({"a.b": 1, "a": {"b": 2}}), &options).unwrap();
    assert_eq!(out, json!({"a.b": "********", "a": {"b": "********"}}));
}

#[test]
fn test_remove_twice_keeps_holes() {
    let options = RedactOptions::new()
        .with_paths(["list.0"])
        .with_mode(Mode::Remove)
        .with_mutate(true);
    let mut document = Document::from_json(json!({"list": ["a", "b"]}));
    redact(&mut document, &options).unwrap();
    redact(&mut document, &options).unwrap();

    assert_eq!(document.get_path("list.0"), Some(&Value::Hole));
    assert_eq!(document.to_json().unwrap(), json!({"list": [null, "b"]}));
}

#[test]
fn test_masking_a_hole() {
    let mut document = Document::from_json(json!([1, 2]));
    let list = document.root().as_container().unwrap();
    document.remove(list, &Key::Index(0)).unwrap();

    let options = RedactOptions::new().with_paths(["0"]).with_preserve_types(true);
    let result = redact(&mut document, &options).unwrap();
    assert_eq!(result.get_path("0"), Some(&Value::from("********")));
}

#[test]
fn test_very_deep_tree() {
    let mut document = Document::new();
    let mut current = document.new_map(Vec::<(String, Value)>::new());
    document.set_root(current.clone());
    for depth in 0..2_000 {
        let next = document.new_map([("password", Value::from(i64::from(depth)))]);
        let id = current.as_container().unwrap();
        document.set(id, Key::from("child"), next.clone()).unwrap();
        current = next;
    }

    let options = RedactOptions::new().with_auto_detect(true);
    let result = redact(&mut document, &options).unwrap();
    let masked = result
        .walk()
        .filter(|node| node.value == Value::from("********"))
        .count();
    assert_eq!(masked, 2_000);
}

#[test]
fn test_very_wide_tree() {
    let items: Vec<_> = (0..10_000).map(|i| json!({"id": i, "ssn": "x"})).collect();
    let options = RedactOptions::new().with_paths(["*.ssn"]);
    let out = redact_json(serde_json::Value::Array(items), &options).unwrap();
    let items = out.as_array().unwrap();
    assert_eq!(items.len(), 10_000);
    assert!(items.iter().all(|item| item["ssn"] == "********"));
    assert_eq!(items[9_999]["id"], 9_999);
}

#[test]
fn test_text_edge_cases() {
    let options = RedactOptions::new().with_auto_detect(true);
    assert_eq!(redact_text("", &options).unwrap(), "");
    assert_eq!(redact_text("[1, 2", &options).unwrap(), "[1, 2");
    assert_eq!(redact_text("\"token\"", &options).unwrap(), "\"token\"");
    assert_eq!(redact_text(" {\"a\" : 1} ", &options).unwrap(), "{\"a\":1}");
    assert!(matches!(
        try_redact_text("", &options),
        Err(RedactError::Parse(_))
    ));
}

#[test]
fn test_unicode_keys_and_values() {
    let options = RedactOptions::new()
        .with_match_keys(["пароль"])
        .with_paths(["données.secret"]);
    let out = redact_json(
        json!({"пароль": "секрет", "données": {"secret": "🔒"}, "名前": "太郎"}),
        &options,
    )
    .unwrap();
    assert_eq!(
        out,
        json!({"пароль": "********", "données": {"secret": "********"}, "名前": "太郎"})
    );
}

#[test]
fn test_mask_value_may_be_empty() {
    let options = RedactOptions::new()
        .with_match_keys(["k"])
        .with_mask_value("");
    assert_eq!(
        redact_json(json!({"k": "v"}), &options).unwrap(),
        json!({"k": ""})
    );
}
