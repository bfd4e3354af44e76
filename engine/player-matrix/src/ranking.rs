//! Per-format consensus ranking
//!
//! Every distinct format key in the matrix gets its own ranking: players that
//! carry the key are ordered by their best (lowest) ADP across sources and
//! numbered from 1.

use crate::matrix::PlayerMatrix;
use crate::types::FormatEntry;
use indexmap::IndexSet;
use std::cmp::Ordering;
use tracing::{debug, info};

/// A ranked player within one format key
#[derive(Debug, Clone, PartialEq)]
pub struct RankedPlayer {
    pub name: String,
    /// Lowest ADP across sources, None if no source reported one
    pub best_adp: Option<f64>,
    pub rank: u32,
}

/// Ranking table for one format key, best first
#[derive(Debug, Clone, PartialEq)]
pub struct FormatRanking {
    pub format_key: String,
    pub players: Vec<RankedPlayer>,
}

impl FormatRanking {
    pub fn rank_of(&self, name: &str) -> Option<u32> {
        self.players.iter().find(|p| p.name == name).map(|p| p.rank)
    }
}

/// Every format key used by any player, in first-seen order
pub fn format_keys(matrix: &PlayerMatrix) -> IndexSet<String> {
    matrix.players().flat_map(|player| player.formats.keys().cloned()).collect()
}

/// Missing scores sort after every real ADP
fn compare_scores(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Rank every format key in the matrix.
///
/// The sort is stable, so players with equal best ADP keep their ingestion
/// order. Unless `verbose` is set, each raw entry is replaced with its rank;
/// in verbose mode the raw per-source stats stay and the ranks are only
/// returned.
pub fn compute_rankings(matrix: &mut PlayerMatrix, verbose: bool) -> Vec<FormatRanking> {
    let keys = format_keys(matrix);
    let mut rankings = Vec::with_capacity(keys.len());

    for key in keys {
        let mut eligible: Vec<(usize, Option<f64>)> = matrix
            .players()
            .enumerate()
            .filter_map(|(index, player)| {
                player.formats.get(&key).map(|entry| (index, entry.ranking_score()))
            })
            .collect();

        eligible.sort_by(|a, b| compare_scores(a.1, b.1));

        let mut players = Vec::with_capacity(eligible.len());
        for (position, (index, best_adp)) in eligible.into_iter().enumerate() {
            let rank = (position + 1) as u32;

            if let Some(record) = matrix.get_index_mut(index) {
                if !verbose {
                    record.formats.insert(key.clone(), FormatEntry::Ranked(rank));
                }
                players.push(RankedPlayer { name: record.name.clone(), best_adp, rank });
            }
        }

        debug!("Ranked {} players for format {}", players.len(), key);
        rankings.push(FormatRanking { format_key: key, players });
    }

    info!("Calculated rankings for {} formats (verbose: {})", rankings.len(), verbose);
    rankings
}
