use adp_compiler::{
    initialize_logging, Cli, Compiler, CompilerConfig, DatasetCache, HttpFetcher,
};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let mut config = CompilerConfig::from_env().context("Failed to load configuration")?;
    cli.apply(&mut config);
    config.validate().context("Invalid configuration")?;

    initialize_logging(&config.logging)?;
    info!("Starting ADP compiler v{}", env!("CARGO_PKG_VERSION"));

    let cache = DatasetCache::today(&config.data_dir);
    let fetcher =
        HttpFetcher::new(config.request_timeout()).context("Failed to create HTTP client")?;

    let compiler = Compiler::new(config, cli.options(), cache, fetcher);
    let summary = compiler.run().await.context("Compile run failed")?;
    summary.log();

    Ok(())
}
