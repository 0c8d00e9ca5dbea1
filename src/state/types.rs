//! State types for tracking sync progress
//!
//! Serialized as a flat JSON object mapping entity name to watermark, e.g.
//! `{"lists": "2021-01-01T00:00:00Z"}`.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Key used by Singer-style state wrappers
const BOOKMARKS_KEY: &str = "bookmarks";

/// Entity → watermark mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SyncState {
    watermarks: BTreeMap<String, String>,
}

impl SyncState {
    /// Create a new empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse prior state
    ///
    /// Accepts the flat mapping this tap writes, and the same mapping
    /// wrapped under a `bookmarks` key.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut map) = value else {
            return Err(Error::state("state must be a JSON object"));
        };

        if let Some(Value::Object(bookmarks)) = map.remove(BOOKMARKS_KEY) {
            map = bookmarks;
        }

        let watermarks = map
            .into_iter()
            .map(|(entity, value)| match value {
                Value::String(s) => Ok((entity, s)),
                other => Err(Error::state(format!(
                    "watermark for '{entity}' must be a string, got {other}"
                ))),
            })
            .collect::<Result<_>>()?;

        Ok(Self { watermarks })
    }

    /// Parse prior state from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| Error::state(format!("Failed to parse state JSON: {e}")))?;
        Self::from_value(value)
    }

    /// Watermark of an entity
    pub fn get(&self, entity: &str) -> Option<&str> {
        self.watermarks.get(entity).map(String::as_str)
    }

    /// Overwrite the watermark of an entity
    pub fn set(&mut self, entity: impl Into<String>, watermark: impl Into<String>) {
        self.watermarks.insert(entity.into(), watermark.into());
    }

    /// Number of entities with a watermark
    pub fn len(&self) -> usize {
        self.watermarks.len()
    }

    /// Whether no watermark is stored
    pub fn is_empty(&self) -> bool {
        self.watermarks.is_empty()
    }

    /// Iterate over (entity, watermark) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.watermarks
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// State as a JSON value
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.watermarks
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect(),
        )
    }
}
