//! Output module
//!
//! Singer messages and the sinks they are written to.
//!
//! # Overview
//!
//! This module provides:
//! - `Message` - the `SCHEMA`, `RECORD` and `STATE` messages of a run
//! - `MessageWriter` - destination of emitted messages
//! - `JsonLinesWriter` - one JSON document per line, used for stdout
//! - `MemoryWriter` - collects messages in memory

mod types;
mod writer;

pub use types::Message;
pub use writer::{JsonLinesWriter, MemoryWriter, MessageWriter};
