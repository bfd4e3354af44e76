use crate::error::Result;
use crate::matrix::PlayerMatrix;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// The compiled `players.json` document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixDocument {
    /// Run date (YYYY-MM-DD)
    pub date: String,
    /// Number of configured sources
    pub sources: usize,
    /// Unique players in the matrix
    pub total_players: usize,
    /// One object per player, keys sorted alphabetically
    pub players: Vec<BTreeMap<String, Value>>,
}

impl MatrixDocument {
    /// Snapshot the matrix. Players keep their first-seen order.
    pub fn build(matrix: &PlayerMatrix, date: NaiveDate, sources: usize) -> Self {
        Self {
            date: date.format("%Y-%m-%d").to_string(),
            sources,
            total_players: matrix.len(),
            players: matrix.players().map(|player| player.sorted_fields()).collect(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Players that ended up with at least one format entry
    pub fn ranked_players(&self) -> usize {
        self.players
            .iter()
            .filter(|player| {
                player.get("formats").and_then(Value::as_object).is_some_and(|f| !f.is_empty())
            })
            .count()
    }
}
