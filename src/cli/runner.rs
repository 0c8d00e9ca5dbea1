//! CLI runner - executes the selected mode

use crate::auth::AuthConfig;
use crate::cli::commands::Cli;
use crate::config::TapConfig;
use crate::engine::{SyncEngine, SyncOrchestrator};
use crate::entities::{EntityDefinition, EntityRegistry};
use crate::error::{Result, ResultExt};
use crate::http::{HttpClient, HttpClientConfig, RateLimiterConfig};
use crate::output::JsonLinesWriter;
use crate::schema::{BundledSchemas, SchemaDir, SchemaSource};
use crate::state::{StateFile, SyncState, WatermarkStore};
use serde_json::{json, Value};
use std::io::Write;
use tracing::info;
use url::Url;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the selected mode
    pub async fn run(&self) -> Result<()> {
        let config = TapConfig::from_file(&self.cli.config)?;
        info!("Loaded config: {config:?}");

        if self.cli.discover {
            self.discover(&config)
        } else {
            self.sync(&config).await
        }
    }

    /// Load prior state
    async fn load_state(&self) -> Result<SyncState> {
        // Inline state takes precedence
        if let Some(state_json) = &self.cli.state_json {
            SyncState::from_json(state_json)
        } else if let Some(path) = &self.cli.state {
            StateFile::new(path).load().await
        } else {
            Ok(SyncState::new())
        }
    }

    fn schema_source(&self) -> Box<dyn SchemaSource> {
        match &self.cli.schemas_dir {
            Some(dir) => Box::new(SchemaDir::new(dir)),
            None => Box::new(BundledSchemas),
        }
    }

    /// Extract the configured entities to stdout
    async fn sync(&self, config: &TapConfig) -> Result<()> {
        let state = self.load_state().await?;
        info!("Loaded state with {} watermarks", state.len());

        let client = build_client(config)?;
        let base_url = Url::parse(&config.api_base_url)?;
        let store = WatermarkStore::new(state, config.start_date.clone());

        let engine = SyncEngine::new(client, base_url, store, JsonLinesWriter::stdout())
            .with_schemas(self.schema_source());
        let mut orchestrator = SyncOrchestrator::new(engine);
        let report = orchestrator.run(&config.entities).await?;

        if let Some(path) = &self.cli.state_output {
            StateFile::new(path)
                .save(&report.state)
                .await
                .with_context(|| format!("Failed to write final state to {}", path.display()))?;
            info!("Wrote state to {}", path.display());
        }
        Ok(())
    }

    /// Print the stream catalog
    fn discover(&self, config: &TapConfig) -> Result<()> {
        let registry = EntityRegistry::builtin();
        let catalog = build_catalog(&registry, &*self.schema_source(), &config.entities)?;

        let mut out = std::io::stdout().lock();
        serde_json::to_writer_pretty(&mut out, &catalog)?;
        writeln!(out)?;
        Ok(())
    }
}

/// Build the HTTP client for a config
///
/// Credentials go out as Basic auth; the User-Agent override, rate limit
/// and timeout come from the config when set.
pub fn build_client(config: &TapConfig) -> Result<HttpClient> {
    let mut builder = HttpClientConfig::builder().timeout(config.request_timeout());
    if let Some(agent) = &config.user_agent {
        builder = builder.user_agent(agent.clone());
    }
    if let Some(rps) = config.requests_per_second {
        builder = builder.rate_limit(RateLimiterConfig::per_second(rps));
    }

    let auth = AuthConfig::basic(&config.app_key, &config.app_secret);
    HttpClient::with_auth(builder.build(), auth)
}

/// Catalog of the given entities, in the given order
pub fn build_catalog<S: AsRef<str>>(
    registry: &EntityRegistry,
    schemas: &dyn SchemaSource,
    entities: &[S],
) -> Result<Value> {
    let mut streams = Vec::new();
    for definition in registry.resolve(entities)? {
        let schema = schemas.load(definition.name)?;
        streams.push(json!({
            "tap_stream_id": definition.name,
            "stream": definition.name,
            "key_properties": definition.key_properties(),
            "replication_method": replication_method(definition),
            "schema": schema.to_json(),
        }));
    }
    Ok(json!({ "streams": streams }))
}

fn replication_method(definition: &EntityDefinition) -> &'static str {
    if definition.is_incremental() {
        "INCREMENTAL"
    } else {
        "FULL_TABLE"
    }
}
