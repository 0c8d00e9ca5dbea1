//! Built-in entity definitions
//!
//! Each Airship resource the tap can extract is described by an
//! [`EntityDefinition`]: its primary keys, the candidate date keys used to
//! position a row in time, an optional structural pre-transform, and whether
//! the dates are epoch milliseconds.

use crate::error::{Error, Result};
use crate::types::{JsonValue, Row};
use std::collections::BTreeMap;

/// Entities synced when the config does not list any
pub const DEFAULT_ENTITIES: [&str; 4] = ["lists", "channels", "segments", "named_users"];

/// Structural rewrite applied to a raw row before date resolution
pub type PreTransform = fn(Row) -> Row;

/// Static extraction parameters of one entity
#[derive(Debug, Clone)]
pub struct EntityDefinition {
    /// Entity name, also the API resource path and the response body key
    pub name: &'static str,
    /// Primary key fields
    pub primary_keys: &'static [&'static str],
    /// Candidate "last touched" fields; empty means full sync only
    pub date_keys: &'static [&'static str],
    /// Optional pre-transform
    pub transform: Option<PreTransform>,
    /// Date values are epoch milliseconds
    pub epoch_millisecond_timestamp: bool,
}

impl EntityDefinition {
    /// Whether rows of this entity are filtered by watermark
    pub fn is_incremental(&self) -> bool {
        !self.date_keys.is_empty()
    }

    /// Primary keys as owned strings (for SCHEMA messages)
    pub fn key_properties(&self) -> Vec<String> {
        self.primary_keys.iter().map(ToString::to_string).collect()
    }

    /// Apply the pre-transform, if any
    pub fn prepare(&self, row: Row) -> Row {
        match self.transform {
            Some(transform) => transform(row),
            None => row,
        }
    }
}

/// Lists and channels carry two ISO dates each.
const LISTS: EntityDefinition = EntityDefinition {
    name: "lists",
    primary_keys: &["name"],
    date_keys: &["created", "last_updated"],
    transform: None,
    epoch_millisecond_timestamp: false,
};

const CHANNELS: EntityDefinition = EntityDefinition {
    name: "channels",
    primary_keys: &["channel_id"],
    date_keys: &["created", "last_registration"],
    transform: None,
    epoch_millisecond_timestamp: false,
};

/// Segment dates are epoch milliseconds.
const SEGMENTS: EntityDefinition = EntityDefinition {
    name: "segments",
    primary_keys: &["id"],
    date_keys: &["creation_date", "modification_date"],
    transform: None,
    epoch_millisecond_timestamp: true,
};

/// Named users embed full channel objects; only their ids are kept.
const NAMED_USERS: EntityDefinition = EntityDefinition {
    name: "named_users",
    primary_keys: &["named_user_id"],
    date_keys: &["created", "last_modified"],
    transform: Some(flatten_channels),
    epoch_millisecond_timestamp: false,
};

/// Replace the `channels` array of channel objects by their `channel_id`s
///
/// Entries without a `channel_id` are dropped. Rows without a `channels`
/// array are returned unchanged.
pub fn flatten_channels(mut row: Row) -> Row {
    if let Some(JsonValue::Array(channels)) = row.get_mut("channels") {
        let ids: Vec<JsonValue> = channels
            .iter()
            .filter_map(|c| c.get("channel_id").cloned())
            .collect();
        *channels = ids;
    }
    row
}

/// Registry of entity definitions, keyed by name
#[derive(Debug, Clone)]
pub struct EntityRegistry {
    entities: BTreeMap<&'static str, EntityDefinition>,
}

impl EntityRegistry {
    /// Registry of the four Airship entities
    pub fn builtin() -> Self {
        Self::from_definitions([LISTS, CHANNELS, SEGMENTS, NAMED_USERS])
    }

    /// Build a registry from arbitrary definitions
    pub fn from_definitions(definitions: impl IntoIterator<Item = EntityDefinition>) -> Self {
        Self {
            entities: definitions.into_iter().map(|d| (d.name, d)).collect(),
        }
    }

    /// Look up a definition
    pub fn get(&self, name: &str) -> Option<&EntityDefinition> {
        self.entities.get(name)
    }

    /// Look up a definition, failing with a configuration error if unknown
    pub fn require(&self, name: &str) -> Result<&EntityDefinition> {
        self.get(name).ok_or_else(|| Error::unknown_entity(name))
    }

    /// Resolve every requested name, preserving the requested order
    pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<&EntityDefinition>> {
        names.iter().map(|n| self.require(n.as_ref())).collect()
    }

    /// Number of registered entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn row(value: JsonValue) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_builtin_registry_has_default_entities() {
        let registry = EntityRegistry::builtin();
        assert_eq!(registry.len(), 4);
        for name in DEFAULT_ENTITIES {
            assert!(registry.get(name).is_some(), "missing {name}");
        }
    }

    #[test]
    fn test_segments_use_epoch_millis() {
        let registry = EntityRegistry::builtin();
        let segments = registry.get("segments").unwrap();
        assert!(segments.epoch_millisecond_timestamp);
        assert_eq!(segments.primary_keys, &["id"]);
        assert_eq!(segments.date_keys, &["creation_date", "modification_date"]);

        assert!(!registry.get("lists").unwrap().epoch_millisecond_timestamp);
    }

    #[test]
    fn test_resolve_preserves_order() {
        let registry = EntityRegistry::builtin();
        let resolved = registry.resolve(&["named_users", "lists"]).unwrap();
        let names: Vec<_> = resolved.iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["named_users", "lists"]);
    }

    #[test]
    fn test_resolve_unknown_entity() {
        let registry = EntityRegistry::builtin();
        let err = registry.resolve(&["lists", "audiences"]).unwrap_err();
        assert!(matches!(err, Error::UnknownEntity { entity } if entity == "audiences"));
    }

    #[test]
    fn test_flatten_channels() {
        let flattened = flatten_channels(row(json!({
            "named_user_id": "user-1",
            "channels": [
                {"channel_id": "abc", "device_type": "ios"},
                {"channel_id": "def", "device_type": "android"}
            ]
        })));

        assert_eq!(flattened["channels"], json!(["abc", "def"]));
        assert_eq!(flattened["named_user_id"], json!("user-1"));
    }

    #[test]
    fn test_flatten_channels_without_channels() {
        let original = row(json!({"named_user_id": "user-1"}));
        assert_eq!(flatten_channels(original.clone()), original);
    }

    #[test]
    fn test_prepare_applies_transform_only_when_defined() {
        let registry = EntityRegistry::builtin();
        let input = row(json!({"channels": [{"channel_id": "abc"}]}));

        let named_users = registry.get("named_users").unwrap();
        assert_eq!(named_users.prepare(input.clone())["channels"], json!(["abc"]));

        let lists = registry.get("lists").unwrap();
        assert_eq!(lists.prepare(input.clone()), input);
    }

    #[test]
    fn test_is_incremental() {
        let full = EntityDefinition {
            name: "audiences",
            primary_keys: &["id"],
            date_keys: &[],
            transform: None,
            epoch_millisecond_timestamp: false,
        };
        assert!(!full.is_incremental());
        assert!(LISTS.is_incremental());
    }
}
