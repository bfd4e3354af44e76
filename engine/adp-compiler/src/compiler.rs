//! Compile run: sources -> matrix -> ranked document

use crate::cache::DatasetCache;
use crate::config::{apply_limit, load_sources, CompilerConfig};
use crate::error::{CompilerError, Result};
use crate::fetcher::{payload_url, DatasetFetcher};
use crate::player_ids::load_espn_index;
use player_matrix::{
    compute_rankings, join_espn_ids, Dataset, MatrixDocument, PlayerMatrix, PlayerPayload,
    SourceSpec,
};
use serde_json::Value;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Switches for a single run
#[derive(Debug, Clone, Copy, Default)]
pub struct CompileOptions {
    /// Key formats by the player's NFL team instead of format name alone
    pub group_by_team: bool,
    /// Only use the first N configured sources
    pub limit: Option<usize>,
    /// Keep raw per-source stats instead of collapsing to ranks
    pub verbose: bool,
    /// Never hit the network; cache misses are skipped
    pub offline: bool,
}

/// What a run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileSummary {
    /// Payloads fetched over HTTP
    pub requests: usize,
    /// Payloads read from today's cache
    pub cache_reads: usize,
    /// Datasets that could not be loaded and were skipped
    pub failures: usize,
    /// Configured sources after the limit, including skipped ones
    pub sources: usize,
    /// Player rows seen across all payloads
    pub player_records: usize,
    /// Unique players in the matrix
    pub unique_players: usize,
    /// Players that received an ESPN id
    pub espn_matches: usize,
    /// Distinct format keys ranked
    pub formats: usize,
    /// Where the document was written
    pub output_path: PathBuf,
}

impl CompileSummary {
    /// Datasets merged into the matrix
    pub fn datasets(&self) -> usize {
        self.requests + self.cache_reads
    }

    pub fn log(&self) {
        info!("Compilation complete:");
        info!("  API requests: {}", self.requests);
        info!("  Cache reads: {}", self.cache_reads);
        info!("  Failed datasets: {}", self.failures);
        info!("  Data sources: {}", self.sources);
        info!("  Player records: {}", self.player_records);
        info!("  Unique players: {}", self.unique_players);
        info!("Matrix ready -> {}", self.output_path.display());
    }
}

/// Where a payload came from
enum Loaded {
    Cache(PlayerPayload),
    Fetched(PlayerPayload),
}

/// Drives ingestion over every configured (source, format, league size)
pub struct Compiler<F: DatasetFetcher> {
    config: CompilerConfig,
    options: CompileOptions,
    cache: DatasetCache,
    fetcher: F,
}

impl<F: DatasetFetcher> Compiler<F> {
    pub fn new(
        config: CompilerConfig,
        options: CompileOptions,
        cache: DatasetCache,
        fetcher: F,
    ) -> Self {
        Self { config, options, cache, fetcher }
    }

    /// Run a full compile and write `players.json`
    pub async fn run(&self) -> Result<CompileSummary> {
        let config = load_sources(&self.config.sources_path).await?;
        let configured = config.sources.len();
        let sources = apply_limit(config.sources, self.options.limit);

        let mut matrix = PlayerMatrix::new();
        let mut summary = CompileSummary { sources: sources.len(), ..Default::default() };

        for (index, source) in sources.iter().enumerate() {
            if source.skip {
                info!("Skipping source {} of {} -> {}", index + 1, configured, source.name);
                continue;
            }

            info!("Compiling source {} of {} -> {} ({})", index + 1, configured, source.name, source.base_url);

            let before = summary.clone();
            self.compile_source(source, &mut matrix, &mut summary).await;

            info!(
                "{} complete ({} reads, {} requests)",
                source.name,
                summary.cache_reads - before.cache_reads,
                summary.requests - before.requests
            );
        }

        if let Some(index) = load_espn_index(&self.cache).await {
            summary.espn_matches = join_espn_ids(&mut matrix, &index);
        }

        info!("Calculating format rankings...");
        let rankings = compute_rankings(&mut matrix, self.options.verbose);
        summary.formats = rankings.len();
        summary.unique_players = matrix.len();

        info!(
            "Built player matrix: {} unique players from {} datasets",
            matrix.len(),
            summary.datasets()
        );

        let document = MatrixDocument::build(&matrix, self.cache.date(), summary.sources);
        summary.output_path = self.cache.output_path();
        self.cache.write_json(&summary.output_path, &document).await?;

        Ok(summary)
    }

    /// Ingest every dataset of one source. Failures are logged and skipped.
    async fn compile_source(
        &self,
        source: &SourceSpec,
        matrix: &mut PlayerMatrix,
        summary: &mut CompileSummary,
    ) {
        if let Err(e) = source.domain() {
            warn!("Skipping source {}: {}", source.name, e);
            summary.failures += 1;
            return;
        }

        for format in &source.formats {
            for teams in format.team_sizes() {
                let dataset = match Dataset::new(source, format, teams) {
                    Ok(dataset) => dataset,
                    Err(e) => {
                        warn!("Skipping {} {} ({} teams): {}", source.name, format.name, teams, e);
                        summary.failures += 1;
                        continue;
                    }
                };

                let payload = match self.load_payload(&dataset).await {
                    Ok(Some(Loaded::Cache(payload))) => {
                        summary.cache_reads += 1;
                        payload
                    }
                    Ok(Some(Loaded::Fetched(payload))) => {
                        summary.requests += 1;
                        payload
                    }
                    Ok(None) => {
                        debug!("No cached data for {} {} ({} teams)", dataset.domain(), format.name, teams);
                        continue;
                    }
                    Err(e) => {
                        warn!("Error loading {} {} ({} teams): {}", dataset.domain(), format.name, teams, e);
                        summary.failures += 1;
                        continue;
                    }
                };

                let stats = matrix.ingest_payload(&payload, &dataset, self.options.group_by_team);
                summary.player_records += stats.total;
            }
        }
    }

    /// Read today's cached payload, or fetch and cache it
    async fn load_payload(&self, dataset: &Dataset<'_>) -> Result<Option<Loaded>> {
        let path = self.cache.payload_path(dataset.domain(), &dataset.format.name, dataset.teams);

        if let Some(value) = self.cache.read_json::<Value>(&path).await? {
            return Ok(Some(Loaded::Cache(into_payload(value)?)));
        }

        if self.options.offline {
            return Ok(None);
        }

        let url = payload_url(dataset.source, dataset.format, dataset.teams);
        let value = self.fetcher.fetch_json(&url).await?;
        let payload = into_payload(value.clone())?;
        self.cache.write_json(&path, &value).await?;

        Ok(Some(Loaded::Fetched(payload)))
    }
}

fn into_payload(value: Value) -> Result<PlayerPayload> {
    serde_json::from_value(value).map_err(CompilerError::from)
}
