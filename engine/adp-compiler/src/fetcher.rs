use crate::error::{CompilerError, Result};
use async_trait::async_trait;
use player_matrix::{FormatSpec, SourceSpec};
use reqwest::Client;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::info;

/// Retrieves source payloads and the ID dataset
#[async_trait]
pub trait DatasetFetcher: Send + Sync {
    /// GET a URL and parse the body as JSON
    async fn fetch_json(&self, url: &str) -> Result<Value>;

    /// GET a URL and return the body as text
    async fn fetch_text(&self, url: &str) -> Result<String>;
}

/// URL of one (source, format, league size) payload
pub fn payload_url(source: &SourceSpec, format: &FormatSpec, teams: u32) -> String {
    format!("{}/{}?teams={}", source.base_url, format.name, teams)
}

/// reqwest-backed fetcher
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("adp-compiler/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        info!("Fetching {}", url);

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(CompilerError::HttpStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl DatasetFetcher for HttpFetcher {
    async fn fetch_json(&self, url: &str) -> Result<Value> {
        Ok(self.get(url).await?.json().await?)
    }

    async fn fetch_text(&self, url: &str) -> Result<String> {
        Ok(self.get(url).await?.text().await?)
    }
}

/// Convert the player ID CSV into flat JSON rows.
///
/// Headers and cells are trimmed; blank cells become `null`.
pub fn parse_player_ids_csv(text: &str) -> Result<Vec<Map<String, Value>>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();

    for record in reader.records() {
        let record = record?;
        let row = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let value = match record.get(i) {
                    Some(cell) if !cell.is_empty() => Value::String(cell.to_string()),
                    _ => Value::Null,
                };
                (header.to_string(), value)
            })
            .collect();
        rows.push(row);
    }

    Ok(rows)
}
