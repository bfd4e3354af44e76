use adp_compiler::{
    download_player_ids, initialize_logging, CompilerConfig, DatasetCache, HttpFetcher,
};
use anyhow::{Context, Result};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let config = CompilerConfig::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    initialize_logging(&config.logging)?;

    let cache = DatasetCache::today(&config.data_dir);
    let fetcher =
        HttpFetcher::new(config.request_timeout()).context("Failed to create HTTP client")?;

    match download_player_ids(&cache, &fetcher, &config.player_ids_url)
        .await
        .context("Failed to download player IDs")?
    {
        Some(count) => info!("Wrote {} rows to {}", count, cache.player_ids_path().display()),
        None => info!("Nothing to do"),
    }

    Ok(())
}
