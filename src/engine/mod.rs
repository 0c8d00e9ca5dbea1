//! Execution engine module
//!
//! Per-entity extraction and run orchestration.
//!
//! # Overview
//!
//! The engine module provides:
//! - `SyncEngine` - syncs one entity: schema, watermark, pages, state
//! - `SyncOrchestrator` - runs the configured entities in order
//! - `EntityStats` / `SyncStats` - counters reported at the end of a run

mod orchestrator;
mod types;

pub use orchestrator::SyncOrchestrator;
pub use types::{EntityStats, SyncReport, SyncStats};

use crate::bookmark::{is_before, resolve_last_touched};
use crate::entities::EntityDefinition;
use crate::error::Result;
use crate::http::HttpClient;
use crate::output::{Message, MessageWriter};
use crate::pagination::Paginator;
use crate::schema::{BundledSchemas, SchemaSource};
use crate::state::WatermarkStore;
use crate::transform::transform_row;
use std::time::Instant;
use tracing::{debug, info};
use url::Url;

/// Sync engine for extracting entities
pub struct SyncEngine<W: MessageWriter> {
    /// HTTP client
    client: HttpClient,
    /// API base URL
    base_url: Url,
    /// Output schemas
    schemas: Box<dyn SchemaSource>,
    /// Watermarks of this run
    store: WatermarkStore,
    /// Message sink
    writer: W,
}

impl<W: MessageWriter> SyncEngine<W> {
    /// Create a new sync engine using the bundled schemas
    pub fn new(client: HttpClient, base_url: Url, store: WatermarkStore, writer: W) -> Self {
        Self {
            client,
            base_url,
            schemas: Box::new(BundledSchemas),
            store,
            writer,
        }
    }

    /// Use another schema source
    #[must_use]
    pub fn with_schemas(mut self, schemas: impl SchemaSource + 'static) -> Self {
        self.schemas = Box::new(schemas);
        self
    }

    /// Get the watermark store
    pub fn store(&self) -> &WatermarkStore {
        &self.store
    }

    /// Get the message writer
    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Consume the engine, returning its writer
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Sync a single entity
    ///
    /// Emits the schema, then every row touched at or after the watermark
    /// held when the entity started, then the state. Every row read moves
    /// the watermark, emitted or not.
    pub async fn sync_entity(&mut self, definition: &EntityDefinition) -> Result<EntityStats> {
        let start = Instant::now();
        let entity = definition.name;
        let mut stats = EntityStats::new(entity);

        let schema = self.schemas.load(entity)?;
        self.writer.write(&Message::schema(
            entity,
            schema.clone(),
            definition.key_properties(),
        ))?;

        let threshold = self.store.get(entity);
        info!("Syncing {entity} from {threshold}");

        let mut paginator = Paginator::new(&self.client, &self.base_url, entity)?;
        while let Some(raw) = paginator.next_row().await? {
            let row = definition.prepare(raw);

            if let Some(last_touched) = resolve_last_touched(definition, &row)? {
                self.store.update(entity, last_touched.as_str());
                if is_before(&last_touched, &threshold) {
                    debug!("Skipping {entity} row last touched {last_touched}");
                    stats.add_skipped();
                    continue;
                }
            }

            let record = transform_row(&row, &schema);
            self.writer.write(&Message::record(entity, record))?;
            stats.add_emitted();
        }

        let progress = paginator.state();
        stats.pages_fetched = progress.pages_fetched;
        stats.rows_read = progress.rows_yielded;

        self.emit_state()?;

        stats.set_duration(start.elapsed().as_millis() as u64);
        info!(
            "Synced {entity}: {} pages, {} rows, {} emitted, {} skipped in {}ms",
            stats.pages_fetched,
            stats.rows_read,
            stats.records_emitted,
            stats.records_skipped,
            stats.duration_ms
        );
        Ok(stats)
    }

    /// Emit a state message with every watermark
    pub fn emit_state(&mut self) -> Result<()> {
        self.writer.write(&Message::state(self.store.snapshot()))
    }

    /// Flush the writer
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()
    }
}

impl<W: MessageWriter> std::fmt::Debug for SyncEngine<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("client", &self.client)
            .field("base_url", &self.base_url.as_str())
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}
