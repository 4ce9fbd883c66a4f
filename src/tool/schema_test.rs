// ABOUTME: Tests for argument validation against declared JSON Schemas.
// ABOUTME: Covers required fields, types, ranges, enums, nesting, and null handling.

use serde_json::json;

use super::schema::{drop_nulls, validate};
use crate::error::ErrorKind;

fn search_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "query": { "type": "string", "minLength": 1, "maxLength": 20 },
            "limit": { "type": "integer", "minimum": 1, "maximum": 100 },
            "similarity_threshold": { "type": "number", "minimum": 0.0, "maximum": 1.0 },
            "depth": { "type": "string", "enum": ["standard", "deep"] },
            "domains": { "type": "array", "items": { "type": "string" } },
            "answer": { "type": ["boolean", "string"] },
            "code": { "type": "string", "pattern": "^[a-z]{2}$" }
        },
        "required": ["query"]
    })
}

fn message(params: serde_json::Value) -> String {
    let err = validate(&search_schema(), &params).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    err.to_string()
}

#[test]
fn test_valid_arguments() {
    let params = json!({
        "query": "rust",
        "limit": 10,
        "similarity_threshold": 0.5,
        "depth": "deep",
        "domains": ["docs.rs"],
        "answer": "basic",
        "code": "en"
    });
    assert!(validate(&search_schema(), &params).is_ok());
}

#[test]
fn test_missing_required() {
    assert!(message(json!({"limit": 3})).contains("missing required field `query`"));
    assert!(message(json!({"query": null})).contains("`query`"));
    assert!(message(serde_json::Value::Null).contains("`query`"));
}

#[test]
fn test_optional_null_is_absent() {
    assert!(validate(&search_schema(), &json!({"query": "x", "limit": null})).is_ok());
}

#[test]
fn test_wrong_type() {
    let msg = message(json!({"query": 42}));
    assert!(msg.starts_with("`query`: "));
    assert!(msg.contains("string"));

    let msg = message(json!({"query": "x", "limit": 2.5}));
    assert!(msg.starts_with("`limit`: "));
    assert!(msg.contains("integer"));
}

#[test]
fn test_integral_float_counts_as_integer() {
    assert!(validate(&search_schema(), &json!({"query": "x", "limit": 5.0})).is_ok());
}

#[test]
fn test_threshold_out_of_range() {
    let msg = message(json!({"query": "x", "similarity_threshold": 5.0}));
    assert!(msg.starts_with("`similarity_threshold`: "));
    assert!(msg.contains("maximum"));

    let msg = message(json!({"query": "x", "similarity_threshold": -0.1}));
    assert!(msg.starts_with("`similarity_threshold`: "));
    assert!(msg.contains("minimum"));
}

#[test]
fn test_string_lengths() {
    assert!(message(json!({"query": ""})).contains("shorter than 1 character"));
    assert!(message(json!({"query": "x".repeat(21)})).contains("longer than 20 characters"));
}

#[test]
fn test_enum() {
    let msg = message(json!({"query": "x", "depth": "shallow"}));
    assert!(msg.starts_with("`depth`: "));
    assert!(msg.contains("shallow"));
}

#[test]
fn test_pattern() {
    let msg = message(json!({"query": "x", "code": "ENG"}));
    assert!(msg.starts_with("`code`: "));
    assert!(msg.contains("does not match"));
}

#[test]
fn test_array_items() {
    let msg = message(json!({"query": "x", "domains": ["ok", 3]}));
    assert!(msg.starts_with("`domains[1]`: "));
}

#[test]
fn test_union_type() {
    assert!(validate(&search_schema(), &json!({"query": "x", "answer": true})).is_ok());
    let msg = message(json!({"query": "x", "answer": 1}));
    assert!(msg.starts_with("`answer`: "));
    assert!(msg.contains("boolean"));
}

#[test]
fn test_closed_object_rejects_unknown() {
    let schema = json!({
        "type": "object",
        "properties": { "url": { "type": "string" } },
        "additionalProperties": false
    });
    let err = validate(&schema, &json!({"url": "a", "extra": 1})).unwrap_err();
    assert!(err.to_string().contains("unexpected field `extra`"));

    let open = json!({ "type": "object", "properties": {} });
    assert!(validate(&open, &json!({"extra": 1})).is_ok());
}

#[test]
fn test_nested_object() {
    let schema = json!({
        "type": "object",
        "properties": {
            "filter": {
                "type": "object",
                "properties": { "source": { "type": "string" } },
                "required": ["source"]
            }
        }
    });
    let err = validate(&schema, &json!({"filter": {}})).unwrap_err();
    assert!(err.to_string().contains("missing required field `filter.source`"));
}

#[test]
fn test_non_object_arguments() {
    let err = validate(&search_schema(), &json!(["query"])).unwrap_err();
    assert!(err.to_string().contains("arguments must be an object, got array"));
}

#[test]
fn test_every_violation_is_reported() {
    let msg = message(json!({"limit": 0, "depth": "shallow"}));
    assert!(msg.contains("missing required field `query`"));
    assert!(msg.contains("`limit`"));
    assert!(msg.contains("`depth`"));
}

#[test]
fn test_nested_null_is_absent() {
    let schema = json!({
        "type": "object",
        "properties": {
            "filter": {
                "type": "object",
                "properties": { "source": { "type": "string" } }
            }
        }
    });
    assert!(validate(&schema, &json!({"filter": {"source": null}})).is_ok());
}

#[test]
fn test_broken_schema_is_internal() {
    let schema = json!({ "type": "object", "properties": { "x": { "type": "no-such-type" } } });
    let err = validate(&schema, &json!({})).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Internal);
}

#[test]
fn test_drop_nulls() {
    assert_eq!(
        drop_nulls(json!({"a": null, "b": {"c": null, "d": 1}, "e": [null]})),
        json!({"b": {"d": 1}, "e": [null]})
    );
    assert_eq!(drop_nulls(serde_json::Value::Null), json!({}));
}
