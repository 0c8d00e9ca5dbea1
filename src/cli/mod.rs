//! CLI module
//!
//! Command-line interface for running the tap.
//!
//! # Modes
//!
//! - sync (default) - extract the configured entities as Singer messages
//! - `--discover` - print the catalog of streams with their schemas

mod commands;
mod runner;

pub use commands::Cli;
pub use runner::{build_catalog, build_client, Runner};
