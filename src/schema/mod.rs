//! Schema module
//!
//! Output schemas of the synced entities.
//!
//! # Features
//!
//! - **Typed Schemas**: JSON Schema subset used to gate emitted records
//! - **Bundled Catalog**: one schema per built-in entity, compiled in
//! - **Directory Override**: load `<entity>.json` files from disk instead

mod loader;
mod types;

pub use loader::{parse_schema, BundledSchemas, SchemaDir, SchemaSource};
pub use types::{JsonSchema, JsonType, JsonTypeOrArray, SchemaProperty};

#[cfg(test)]
mod tests;
