//! Dated on-disk dataset cache
//!
//! Payloads are stored once per day under `<data_dir>/<YYYY-MM-DD>/`, so a
//! rerun on the same day reads from disk instead of hitting the sources again.

use crate::error::{CompilerError, Result};
use chrono::{Local, NaiveDate};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File cache for source payloads, the ID dataset and the compiled output
#[derive(Debug, Clone)]
pub struct DatasetCache {
    data_dir: PathBuf,
    date: NaiveDate,
}

impl DatasetCache {
    pub fn new(data_dir: impl Into<PathBuf>, date: NaiveDate) -> Self {
        Self { data_dir: data_dir.into(), date }
    }

    /// Cache for the current local date
    pub fn today(data_dir: impl Into<PathBuf>) -> Self {
        Self::new(data_dir, Local::now().date_naive())
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Directory holding everything fetched or written today
    pub fn day_dir(&self) -> PathBuf {
        self.data_dir.join(self.date.format("%Y-%m-%d").to_string())
    }

    /// Path of one (source, format, league size) payload
    pub fn payload_path(&self, domain: &str, format: &str, teams: u32) -> PathBuf {
        self.day_dir().join(format!("{domain}-{format}-{teams}.json"))
    }

    /// Path of the compiled matrix document
    pub fn output_path(&self) -> PathBuf {
        self.day_dir().join("players.json")
    }

    /// Path of the cached ID dataset (not dated, it rarely changes)
    pub fn player_ids_path(&self) -> PathBuf {
        self.data_dir.join("player_ids.json")
    }

    pub async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    /// Read and parse a cached JSON file, `None` if it is not there
    pub async fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>> {
        let json = match tokio::fs::read_to_string(path).await {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CompilerError::io(path, e)),
        };

        debug!("Read {}", path.display());
        Ok(Some(serde_json::from_str(&json)?))
    }

    /// Write pretty JSON, creating parent directories as needed
    pub async fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| CompilerError::io(parent, e))?;
        }

        let json = serde_json::to_string_pretty(value)?;
        tokio::fs::write(path, json).await.map_err(|e| CompilerError::io(path, e))?;

        debug!("Write {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn cache(dir: &Path) -> DatasetCache {
        DatasetCache::new(dir, NaiveDate::from_ymd_opt(2025, 8, 20).unwrap())
    }

    #[test]
    fn test_paths() {
        let cache = cache(Path::new("/tmp/adp"));

        assert_eq!(
            cache.payload_path("fantasyfootballcalculator.com", "half-ppr", 10),
            PathBuf::from("/tmp/adp/2025-08-20/fantasyfootballcalculator.com-half-ppr-10.json")
        );
        assert_eq!(cache.output_path(), PathBuf::from("/tmp/adp/2025-08-20/players.json"));
        assert_eq!(cache.player_ids_path(), PathBuf::from("/tmp/adp/player_ids.json"));
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache(dir.path());
        let path = cache.payload_path("a.example.com", "ppr", 12);

        assert!(!cache.exists(&path).await);
        assert_eq!(cache.read_json::<Value>(&path).await.unwrap(), None);

        let payload = json!({"players": [{"name": "Drake London", "adp": 25.0}]});
        cache.write_json(&path, &payload).await.unwrap();

        assert!(cache.exists(&path).await);
        assert_eq!(cache.read_json::<Value>(&path).await.unwrap(), Some(payload));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache(dir.path());
        let path = cache.output_path();

        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(cache.read_json::<Value>(&path).await, Err(CompilerError::Json(_))));
    }
}
