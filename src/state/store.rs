//! In-run watermark store

use super::types::SyncState;

/// Per-entity watermarks for one run
///
/// Seeded from prior state; entities never synced before start at the
/// configured start date. Owned by a single engine, so no locking.
#[derive(Debug, Clone)]
pub struct WatermarkStore {
    state: SyncState,
    start_date: String,
}

impl WatermarkStore {
    /// Create a store from prior state and the default start date
    pub fn new(prior: SyncState, start_date: impl Into<String>) -> Self {
        Self {
            state: prior,
            start_date: start_date.into(),
        }
    }

    /// Current watermark of an entity
    ///
    /// An entity without a watermark is seeded with the start date, which
    /// is recorded so it shows up in the next snapshot.
    pub fn get(&mut self, entity: &str) -> String {
        if let Some(watermark) = self.state.get(entity) {
            return watermark.to_string();
        }
        self.state.set(entity, self.start_date.clone());
        self.start_date.clone()
    }

    /// Current watermark without seeding
    pub fn peek(&self, entity: &str) -> Option<&str> {
        self.state.get(entity)
    }

    /// Replace the watermark of an entity
    ///
    /// This is an overwrite, not a max-merge: the last row processed wins.
    pub fn update(&mut self, entity: &str, candidate: impl Into<String>) {
        self.state.set(entity, candidate);
    }

    /// Full state for persistence
    pub fn snapshot(&self) -> SyncState {
        self.state.clone()
    }

    /// Default watermark for never-synced entities
    pub fn start_date(&self) -> &str {
        &self.start_date
    }
}
