//! ADP Compiler
//!
//! Walks every configured source, format and league size, loads each payload
//! from today's cache or over HTTP, and feeds it to the player matrix. After
//! ingestion it attaches ESPN ids, ranks every format and writes the
//! compiled `players.json`.

pub mod cache;
pub mod cli;
pub mod compiler;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod logging;
pub mod player_ids;

pub use cache::DatasetCache;
pub use cli::Cli;
pub use compiler::{CompileOptions, CompileSummary, Compiler};
pub use config::{CompilerConfig, LoggingConfig};
pub use error::{CompilerError, Result};
pub use fetcher::{DatasetFetcher, HttpFetcher};
pub use logging::initialize_logging;
pub use player_ids::download_player_ids;
