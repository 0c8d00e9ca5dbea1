//! State management module
//!
//! Watermark tracking and persistence between sync runs.
//!
//! # Overview
//!
//! The state module provides:
//! - `SyncState` - the persisted entity → watermark mapping
//! - `WatermarkStore` - the in-run store seeded from prior state or the start date
//! - `StateFile` - loading prior state and writing snapshots to disk

mod manager;
mod store;
mod types;

pub use manager::StateFile;
pub use store::WatermarkStore;
pub use types::SyncState;
