//! Compiler configuration

use crate::error::{CompilerError, Result};
use player_matrix::{SourceConfig, SourceSpec};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Cross-reference ID dataset (one row per player, ids for many sites)
pub const DEFAULT_PLAYER_IDS_URL: &str =
    "https://raw.githubusercontent.com/mayscopeland/ffb_ids/refs/heads/main/player_ids.csv";

/// Main compiler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Path to `sources.json`
    pub sources_path: PathBuf,

    /// Root of the dated dataset cache and output
    pub data_dir: PathBuf,

    /// Where the player ID CSV is downloaded from
    pub player_ids_url: String,

    /// HTTP timeout per request
    pub request_timeout_secs: u64,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json, pretty, compact)
    pub format: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            sources_path: PathBuf::from("./sources.json"),
            data_dir: PathBuf::from("./data"),
            player_ids_url: DEFAULT_PLAYER_IDS_URL.to_string(),
            request_timeout_secs: 30,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "compact".to_string() }
    }
}

impl CompilerConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("ADP_SOURCES") {
            config.sources_path = PathBuf::from(path);
        }

        if let Ok(dir) = std::env::var("ADP_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }

        if let Ok(url) = std::env::var("ADP_PLAYER_IDS_URL") {
            config.player_ids_url = url;
        }

        if let Ok(timeout) = std::env::var("ADP_REQUEST_TIMEOUT_SECS") {
            config.request_timeout_secs = timeout.parse().map_err(|_| {
                CompilerError::Configuration(format!("Invalid request timeout: {timeout}"))
            })?;
        }

        if let Ok(level) = std::env::var("ADP_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(format) = std::env::var("ADP_LOG_FORMAT") {
            config.logging.format = format;
        }

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(CompilerError::Configuration(format!("Invalid log level: {other}")))
            }
        }

        match self.logging.format.as_str() {
            "json" | "pretty" | "compact" => {}
            other => {
                return Err(CompilerError::Configuration(format!("Invalid log format: {other}")))
            }
        }

        if self.request_timeout_secs == 0 {
            return Err(CompilerError::Configuration(
                "Request timeout must be at least one second".to_string(),
            ));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Load `sources.json`
pub async fn load_sources(path: &Path) -> Result<SourceConfig> {
    let json =
        tokio::fs::read_to_string(path).await.map_err(|e| CompilerError::io(path, e))?;
    Ok(SourceConfig::from_json(&json)?)
}

/// Keep the first `limit` sources. Skipped sources still count toward it.
pub fn apply_limit(sources: Vec<SourceSpec>, limit: Option<usize>) -> Vec<SourceSpec> {
    match limit {
        Some(limit) if limit > 0 => sources.into_iter().take(limit).collect(),
        _ => sources,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(name: &str, skip: bool) -> SourceSpec {
        SourceSpec {
            name: name.to_string(),
            base_url: format!("https://{name}.example.com"),
            skip,
            fields: vec![],
            formats: vec![],
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(CompilerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = CompilerConfig::default();
        config.logging.level = "loud".to_string();
        assert!(matches!(config.validate(), Err(CompilerError::Configuration(_))));

        let mut config = CompilerConfig::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());

        let config = CompilerConfig { request_timeout_secs: 0, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_limit_counts_skipped_sources() {
        let sources = vec![source("a", true), source("b", false), source("c", false)];

        let limited = apply_limit(sources.clone(), Some(2));
        let names: Vec<_> = limited.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);

        assert_eq!(apply_limit(sources.clone(), None).len(), 3);
        assert_eq!(apply_limit(sources, Some(0)).len(), 3);
    }

    #[tokio::test]
    async fn test_load_sources() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sources.json");
        std::fs::write(
            &path,
            r#"{"sources": [{"name": "FFC", "baseUrl": "https://ffc.example.com/adp", "fields": ["team"]}]}"#,
        )
        .unwrap();

        let config = load_sources(&path).await.unwrap();
        assert_eq!(config.sources.len(), 1);
        assert!(config.sources[0].formats.is_empty());

        let missing = load_sources(&dir.path().join("nope.json")).await;
        assert!(matches!(missing, Err(CompilerError::Io { .. })));
    }
}
