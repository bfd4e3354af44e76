use crate::cache::DatasetCache;
use crate::error::Result;
use crate::fetcher::{parse_player_ids_csv, DatasetFetcher};
use player_matrix::{EspnIdIndex, PlayerIdRecord};
use tracing::{info, warn};

/// Download the ID dataset unless it is already cached.
///
/// Returns the number of rows written, or `None` when the cache was used.
pub async fn download_player_ids<F: DatasetFetcher + ?Sized>(
    cache: &DatasetCache,
    fetcher: &F,
    url: &str,
) -> Result<Option<usize>> {
    let path = cache.player_ids_path();
    if cache.exists(&path).await {
        info!("Player IDs already cached at {}", path.display());
        return Ok(None);
    }

    info!("Downloading player ID mappings...");
    let csv = fetcher.fetch_text(url).await?;
    let rows = parse_player_ids_csv(&csv)?;

    cache.write_json(&path, &rows).await?;
    info!("Cached {} player ID mappings", rows.len());

    Ok(Some(rows.len()))
}

/// Load the cached ID dataset as an index, if present and readable
pub async fn load_espn_index(cache: &DatasetCache) -> Option<EspnIdIndex> {
    let path = cache.player_ids_path();

    match cache.read_json::<Vec<PlayerIdRecord>>(&path).await {
        Ok(Some(records)) => Some(EspnIdIndex::from_records(&records)),
        Ok(None) => {
            info!("No player ID dataset at {}, skipping ESPN ids", path.display());
            None
        }
        Err(e) => {
            warn!("Ignoring unreadable player ID dataset: {}", e);
            None
        }
    }
}
