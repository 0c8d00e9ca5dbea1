// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::needless_pass_by_value)]

//! # tap-urban-airship
//!
//! Incremental extraction of Urban Airship API resources as a stream of
//! Singer messages.
//!
//! ## Features
//!
//! - **Incremental Sync**: per-entity watermarks, rows older than the last
//!   run are read but not emitted
//! - **Next-Page Pagination**: follows `next_page` links row by row
//! - **Retrying Client**: transient failures retried with exponential backoff
//! - **Typed Output**: records shaped by bundled JSON Schemas
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tap_urban_airship::cli::build_client;
//! use tap_urban_airship::engine::{SyncEngine, SyncOrchestrator};
//! use tap_urban_airship::output::JsonLinesWriter;
//! use tap_urban_airship::state::{SyncState, WatermarkStore};
//! use tap_urban_airship::{Result, TapConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<()> {
//!     let config = TapConfig::from_file("config.json")?;
//!     let store = WatermarkStore::new(SyncState::new(), config.start_date.clone());
//!     let base_url = url::Url::parse(&config.api_base_url)?;
//!
//!     let engine = SyncEngine::new(build_client(&config)?, base_url, store, JsonLinesWriter::stdout());
//!     let report = SyncOrchestrator::new(engine).run(&config.entities).await?;
//!     println!("{} records", report.stats.records_emitted());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       SyncOrchestrator                          │
//! │        entities in order → SyncEngine::sync_entity each         │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬─────────────┐
//! │   HTTP   │ Paginate  │   Bookmark    │ Transform │   Output    │
//! ├──────────┼───────────┼───────────────┼───────────┼─────────────┤
//! │ Basic    │ next_page │ Date keys     │ Schema    │ SCHEMA      │
//! │ Retry    │ Row cursor│ Epoch millis  │ Coercion  │ RECORD      │
//! │ Backoff  │           │ Watermarks    │           │ STATE       │
//! └──────────┴───────────┴───────────────┴───────────┴─────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the tap
pub mod error;

/// Common types and type aliases
pub mod types;

/// Tap configuration
pub mod config;

/// Built-in entity definitions
pub mod entities;

/// Authentication
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Next-page pagination
pub mod pagination;

/// Row timestamps and watermark values
pub mod bookmark;

/// Watermark state and persistence
pub mod state;

/// Output schemas
pub mod schema;

/// Record transformation against schemas
pub mod transform;

/// Singer messages and writers
pub mod output;

/// Main execution engine
pub mod engine;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::TapConfig;
pub use error::{Error, Result};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
