//! Schema loading
//!
//! Schemas ship inside the binary; a directory of `<entity>.json` files can
//! replace them at runtime.

use super::types::JsonSchema;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Source of per-entity output schemas
pub trait SchemaSource {
    /// Load and validate the schema of an entity
    fn load(&self, entity: &str) -> Result<JsonSchema>;
}

impl<T: SchemaSource + ?Sized> SchemaSource for Box<T> {
    fn load(&self, entity: &str) -> Result<JsonSchema> {
        (**self).load(entity)
    }
}

/// Schemas compiled into the binary
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledSchemas;

impl BundledSchemas {
    fn raw(entity: &str) -> Option<&'static str> {
        match entity {
            "lists" => Some(include_str!("../../schemas/lists.json")),
            "channels" => Some(include_str!("../../schemas/channels.json")),
            "segments" => Some(include_str!("../../schemas/segments.json")),
            "named_users" => Some(include_str!("../../schemas/named_users.json")),
            _ => None,
        }
    }
}

impl SchemaSource for BundledSchemas {
    fn load(&self, entity: &str) -> Result<JsonSchema> {
        let raw = Self::raw(entity).ok_or_else(|| Error::SchemaNotFound {
            entity: entity.to_string(),
        })?;
        parse_schema(entity, raw)
    }
}

/// Schemas read from `<dir>/<entity>.json`
#[derive(Debug, Clone)]
pub struct SchemaDir {
    dir: PathBuf,
}

impl SchemaDir {
    /// Create a source reading from `dir`
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Path of an entity's schema file
    pub fn path_for(&self, entity: &str) -> PathBuf {
        self.dir.join(format!("{entity}.json"))
    }
}

impl SchemaSource for SchemaDir {
    fn load(&self, entity: &str) -> Result<JsonSchema> {
        let path = self.path_for(entity);
        if !path.exists() {
            return Err(Error::SchemaNotFound {
                entity: entity.to_string(),
            });
        }
        let raw = std::fs::read_to_string(&path)
            .map_err(|e| Error::schema(entity, format!("{}: {e}", path.display())))?;
        parse_schema(entity, &raw)
    }
}

/// Parse and validate a schema document
pub fn parse_schema(entity: &str, raw: &str) -> Result<JsonSchema> {
    let schema: JsonSchema =
        serde_json::from_str(raw).map_err(|e| Error::schema(entity, e.to_string()))?;
    schema.check().map_err(|message| Error::schema(entity, message))?;
    Ok(schema)
}
