//! Schema types
//!
//! The subset of JSON Schema that drives record transformation. Keywords
//! not modelled here are kept in `extra` so the schema is re-emitted as it
//! was loaded.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// JSON Schema type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
    Null,
}

impl std::fmt::Display for JsonType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JsonType::String => write!(f, "string"),
            JsonType::Number => write!(f, "number"),
            JsonType::Integer => write!(f, "integer"),
            JsonType::Boolean => write!(f, "boolean"),
            JsonType::Object => write!(f, "object"),
            JsonType::Array => write!(f, "array"),
            JsonType::Null => write!(f, "null"),
        }
    }
}

/// JSON type can be a single type or array of types (for nullable)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonTypeOrArray {
    Single(JsonType),
    Multiple(Vec<JsonType>),
}

impl JsonTypeOrArray {
    /// Create a single type
    pub fn single(t: JsonType) -> Self {
        JsonTypeOrArray::Single(t)
    }

    /// Create a nullable type
    pub fn nullable(t: JsonType) -> Self {
        if t == JsonType::Null {
            JsonTypeOrArray::Single(JsonType::Null)
        } else {
            JsonTypeOrArray::Multiple(vec![JsonType::Null, t])
        }
    }

    /// Declared types, in declaration order
    pub fn types(&self) -> &[JsonType] {
        match self {
            JsonTypeOrArray::Single(t) => std::slice::from_ref(t),
            JsonTypeOrArray::Multiple(types) => types,
        }
    }

    /// Check if a type is allowed
    pub fn allows(&self, t: JsonType) -> bool {
        self.types().contains(&t)
    }

    /// Check if this type is nullable
    pub fn is_nullable(&self) -> bool {
        self.allows(JsonType::Null)
    }
}

/// JSON Schema property definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaProperty {
    /// Property type(s); absent means any value is accepted
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub json_type: Option<JsonTypeOrArray>,

    /// Format hint (e.g., "date-time")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Nested properties (for objects)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, SchemaProperty>>,

    /// Additional properties allowed (for objects)
    #[serde(
        rename = "additionalProperties",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<bool>,

    /// Array items schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaProperty>>,

    /// Keywords not interpreted by the transformer
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl SchemaProperty {
    /// Create a new property with the given type
    pub fn new(json_type: JsonType) -> Self {
        Self {
            json_type: Some(JsonTypeOrArray::single(json_type)),
            ..Self::default()
        }
    }

    /// Create a nullable property
    pub fn nullable(json_type: JsonType) -> Self {
        Self {
            json_type: Some(JsonTypeOrArray::nullable(json_type)),
            ..Self::default()
        }
    }

    /// Create an object property with nested properties
    pub fn object(properties: BTreeMap<String, SchemaProperty>) -> Self {
        Self {
            json_type: Some(JsonTypeOrArray::single(JsonType::Object)),
            properties: Some(properties),
            ..Self::default()
        }
    }

    /// Create an array property with item schema
    pub fn array(items: SchemaProperty) -> Self {
        Self {
            json_type: Some(JsonTypeOrArray::single(JsonType::Array)),
            items: Some(Box::new(items)),
            ..Self::default()
        }
    }

    /// Set format hint
    #[must_use]
    pub fn with_format(mut self, format: &str) -> Self {
        self.format = Some(format.to_string());
        self
    }

    /// Check if nullable (untyped properties accept null)
    pub fn is_nullable(&self) -> bool {
        self.json_type
            .as_ref()
            .map_or(true, JsonTypeOrArray::is_nullable)
    }

    /// Check if this is a date-time string property
    pub fn is_date_time(&self) -> bool {
        self.format.as_deref() == Some("date-time")
    }
}

/// Full JSON Schema document for one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonSchema {
    root: SchemaProperty,
}

impl JsonSchema {
    /// Create an object schema from its properties
    pub fn new(properties: BTreeMap<String, SchemaProperty>) -> Self {
        Self {
            root: SchemaProperty::object(properties),
        }
    }

    /// Wrap a root property
    pub fn from_root(root: SchemaProperty) -> Self {
        Self { root }
    }

    /// Root property (an object)
    pub fn root(&self) -> &SchemaProperty {
        &self.root
    }

    /// Top-level properties
    pub fn properties(&self) -> Option<&BTreeMap<String, SchemaProperty>> {
        self.root.properties.as_ref()
    }

    /// Get a property
    pub fn get_property(&self, name: &str) -> Option<&SchemaProperty> {
        self.properties()?.get(name)
    }

    /// Check that this is an object schema with declared properties
    pub fn check(&self) -> std::result::Result<(), String> {
        match &self.root.json_type {
            Some(t) if t.allows(JsonType::Object) => {}
            Some(t) => return Err(format!("top-level type must be object, got {t:?}")),
            None => return Err("top-level type is missing".to_string()),
        }
        match self.properties() {
            Some(props) if !props.is_empty() => Ok(()),
            _ => Err("schema declares no properties".to_string()),
        }
    }

    /// Convert to JSON value
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}
