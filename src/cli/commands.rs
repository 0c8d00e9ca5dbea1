//! CLI arguments

use clap::Parser;
use std::path::PathBuf;

/// Singer tap for the Urban Airship API
#[derive(Parser, Debug)]
#[command(name = "tap-urban-airship")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (JSON)
    #[arg(short, long)]
    pub config: PathBuf,

    /// State file from a previous run (JSON)
    #[arg(short, long)]
    pub state: Option<PathBuf>,

    /// Inline state JSON, takes precedence over --state
    #[arg(long)]
    pub state_json: Option<String>,

    /// Write the final state to this file
    #[arg(long)]
    pub state_output: Option<PathBuf>,

    /// Directory of `<entity>.json` schemas replacing the bundled ones
    #[arg(long)]
    pub schemas_dir: Option<PathBuf>,

    /// Print the stream catalog instead of syncing
    #[arg(short, long)]
    pub discover: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
