//! tap-urban-airship CLI
//!
//! Singer messages go to stdout, logs to stderr.

use anyhow::Context;
use clap::Parser;
use tap_urban_airship::cli::{Cli, Runner};
use tracing::error;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        error!("{e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mode = if cli.discover { "Discovery" } else { "Sync" };
    Runner::new(cli)
        .run()
        .await
        .with_context(|| format!("{mode} failed"))
}
