//! Tests for schema module

use super::*;
use crate::entities::{EntityRegistry, DEFAULT_ENTITIES};
use crate::error::Error;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::BTreeMap;
use tempfile::tempdir;

// ============================================================================
// Type Tests
// ============================================================================

#[test]
fn test_json_type_or_array() {
    let single = JsonTypeOrArray::single(JsonType::String);
    assert_eq!(single.types(), &[JsonType::String]);
    assert!(!single.is_nullable());

    let nullable = JsonTypeOrArray::nullable(JsonType::Integer);
    assert!(nullable.is_nullable());
    assert!(nullable.allows(JsonType::Integer));
    assert!(!nullable.allows(JsonType::String));
}

#[test]
fn test_json_type_display() {
    assert_eq!(JsonType::Integer.to_string(), "integer");
    assert_eq!(JsonType::Null.to_string(), "null");
}

#[test]
fn test_schema_property_deserialize() {
    let prop: SchemaProperty = serde_json::from_value(json!({
        "type": ["null", "string"],
        "format": "date-time",
        "inclusion": "automatic"
    }))
    .unwrap();

    assert!(prop.is_nullable());
    assert!(prop.is_date_time());
    assert_eq!(prop.extra.get("inclusion"), Some(&json!("automatic")));
}

#[test]
fn test_untyped_property_is_nullable() {
    assert!(SchemaProperty::default().is_nullable());
    assert!(!SchemaProperty::new(JsonType::Boolean).is_nullable());
}

#[test]
fn test_schema_round_trips_unknown_keywords() {
    let raw = json!({
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "id": {"type": "string", "selected": true}
        }
    });
    let schema: JsonSchema = serde_json::from_value(raw.clone()).unwrap();
    assert_eq!(schema.to_json(), raw);
}

#[test]
fn test_schema_check() {
    let mut props = BTreeMap::new();
    props.insert("id".to_string(), SchemaProperty::new(JsonType::String));
    assert!(JsonSchema::new(props).check().is_ok());

    assert!(JsonSchema::new(BTreeMap::new()).check().is_err());
    assert!(JsonSchema::from_root(SchemaProperty::new(JsonType::String))
        .check()
        .is_err());
}

// ============================================================================
// Loader Tests
// ============================================================================

#[test]
fn test_bundled_schemas_declare_keys_of_every_entity() {
    let registry = EntityRegistry::builtin();
    for entity in DEFAULT_ENTITIES {
        let schema = BundledSchemas.load(entity).unwrap();
        let definition = registry.get(entity).unwrap();
        for key in definition.primary_keys.iter().chain(definition.date_keys) {
            assert!(
                schema.get_property(key).is_some(),
                "{entity} schema lacks {key}"
            );
        }
    }
}

#[test]
fn test_bundled_schema_unknown_entity() {
    let err = BundledSchemas.load("audiences").unwrap_err();
    assert!(matches!(err, Error::SchemaNotFound { entity } if entity == "audiences"));
}

#[test]
fn test_schema_dir_loads_files() {
    let dir = tempdir().unwrap();
    std::fs::write(
        dir.path().join("lists.json"),
        r#"{"type": "object", "properties": {"name": {"type": "string"}}}"#,
    )
    .unwrap();

    let source = SchemaDir::new(dir.path());
    let schema = source.load("lists").unwrap();
    assert!(schema.get_property("name").is_some());
    assert!(schema.get_property("created").is_none());
}

#[test]
fn test_schema_dir_missing_file() {
    let dir = tempdir().unwrap();
    let err = SchemaDir::new(dir.path()).load("lists").unwrap_err();
    assert!(matches!(err, Error::SchemaNotFound { .. }));
}

#[test]
fn test_parse_schema_invalid() {
    let err = parse_schema("lists", "{").unwrap_err();
    assert!(matches!(err, Error::Schema { .. }));

    let err = parse_schema("lists", r#"{"type": "array"}"#).unwrap_err();
    assert!(err.to_string().contains("top-level type must be object"));

    let err = parse_schema("lists", r#"{"type": "object", "properties": {}}"#).unwrap_err();
    assert!(err.to_string().contains("no properties"));
}
