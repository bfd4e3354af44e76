//! # Command Line Interface

use crate::compiler::CompileOptions;
use crate::config::CompilerConfig;
use clap::Parser;
use std::path::PathBuf;

/// Compile mock-draft ADP sources into a ranked player matrix
#[derive(Parser, Debug)]
#[command(name = "adp-compiler")]
#[command(about = "Compile mock-draft ADP sources into a ranked player matrix")]
pub struct Cli {
    /// Key formats by the player's NFL team (e.g., "ppr-KC")
    #[arg(long)]
    pub teams: bool,

    /// Only use the first N configured sources
    #[arg(long)]
    pub limit: Option<usize>,

    /// Keep raw per-source stats instead of ranks
    #[arg(long)]
    pub verbose: bool,

    /// Use cached datasets only, never fetch
    #[arg(long)]
    pub offline: bool,

    /// Path to sources.json
    #[arg(long)]
    pub sources: Option<PathBuf>,

    /// Data directory for the cache and output
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Log format (json, pretty, compact)
    #[arg(long)]
    pub log_format: Option<String>,
}

impl Cli {
    /// Flags override whatever the environment configured
    pub fn apply(&self, config: &mut CompilerConfig) {
        if let Some(sources) = &self.sources {
            config.sources_path = sources.clone();
        }
        if let Some(data_dir) = &self.data_dir {
            config.data_dir = data_dir.clone();
        }
        if let Some(format) = &self.log_format {
            config.logging.format = format.clone();
        }
    }

    pub fn options(&self) -> CompileOptions {
        CompileOptions {
            group_by_team: self.teams,
            limit: self.limit,
            verbose: self.verbose,
            offline: self.offline,
        }
    }
}
