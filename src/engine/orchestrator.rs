//! Run orchestration
//!
//! Resolves the requested entities and syncs them one after another.

use super::types::{SyncReport, SyncStats};
use super::SyncEngine;
use crate::entities::EntityRegistry;
use crate::error::Result;
use crate::output::MessageWriter;
use std::time::Instant;
use tracing::info;

/// Runs a list of entities through one engine
#[derive(Debug)]
pub struct SyncOrchestrator<W: MessageWriter> {
    engine: SyncEngine<W>,
    registry: EntityRegistry,
}

impl<W: MessageWriter> SyncOrchestrator<W> {
    /// Create an orchestrator over the built-in entities
    pub fn new(engine: SyncEngine<W>) -> Self {
        Self::with_registry(engine, EntityRegistry::builtin())
    }

    /// Create an orchestrator over a custom registry
    pub fn with_registry(engine: SyncEngine<W>, registry: EntityRegistry) -> Self {
        Self { engine, registry }
    }

    /// Get the engine
    pub fn engine(&self) -> &SyncEngine<W> {
        &self.engine
    }

    /// Consume the orchestrator, returning its engine
    pub fn into_engine(self) -> SyncEngine<W> {
        self.engine
    }

    /// Sync entities in the given order
    ///
    /// Every name is checked against the registry before the first request.
    /// A failing entity aborts the run; state already emitted for earlier
    /// entities stands. A final state is emitted after the last entity.
    pub async fn run<S: AsRef<str>>(&mut self, entities: &[S]) -> Result<SyncReport> {
        let start = Instant::now();
        let definitions = self.registry.resolve(entities)?;

        info!("Starting sync");
        let mut stats = SyncStats::new();
        for definition in definitions {
            let entity_stats = self.engine.sync_entity(definition).await?;
            stats.add_entity(entity_stats);
        }

        self.engine.emit_state()?;
        self.engine.flush()?;

        stats.set_duration(start.elapsed().as_millis() as u64);
        info!(
            "Sync completed: {} entities, {} records in {}ms",
            stats.entities_synced(),
            stats.records_emitted(),
            stats.duration_ms
        );

        Ok(SyncReport {
            stats,
            state: self.engine.store().snapshot(),
        })
    }
}
