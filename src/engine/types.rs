//! Engine types
//!
//! Statistics and the outcome of a sync run.

use crate::state::SyncState;

/// Statistics from syncing one entity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityStats {
    /// Entity name
    pub entity: String,
    /// Pages fetched
    pub pages_fetched: u64,
    /// Raw rows read from the API
    pub rows_read: u64,
    /// Records emitted
    pub records_emitted: u64,
    /// Rows older than the watermark, not emitted
    pub records_skipped: u64,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl EntityStats {
    /// Create empty stats for an entity
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            ..Self::default()
        }
    }

    /// Count an emitted record
    pub fn add_emitted(&mut self) {
        self.records_emitted += 1;
    }

    /// Count a skipped row
    pub fn add_skipped(&mut self) {
        self.records_skipped += 1;
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}

/// Statistics from a sync run
#[derive(Debug, Clone, Default)]
pub struct SyncStats {
    /// Per-entity statistics, in sync order
    pub entities: Vec<EntityStats>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl SyncStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the stats of a completed entity
    pub fn add_entity(&mut self, stats: EntityStats) {
        self.entities.push(stats);
    }

    /// Number of entities synced
    pub fn entities_synced(&self) -> usize {
        self.entities.len()
    }

    /// Total records emitted
    pub fn records_emitted(&self) -> u64 {
        self.entities.iter().map(|e| e.records_emitted).sum()
    }

    /// Total pages fetched
    pub fn pages_fetched(&self) -> u64 {
        self.entities.iter().map(|e| e.pages_fetched).sum()
    }

    /// Stats of one entity
    pub fn entity(&self, name: &str) -> Option<&EntityStats> {
        self.entities.iter().find(|e| e.entity == name)
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct SyncReport {
    /// Run statistics
    pub stats: SyncStats,
    /// Final watermark snapshot
    pub state: SyncState,
}
