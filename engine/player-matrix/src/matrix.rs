use crate::error::Result;
use crate::extract::extract_fields;
use crate::normalize::normalize_name;
use crate::types::{FormatEntry, FormatSpec, PlayerPayload, PlayerRecord, RawPlayer, SourceSpec, SourceStats};
use indexmap::IndexMap;
use tracing::{debug, warn};

/// Team component used in grouped format keys when a player has no team yet
pub const UNKNOWN_TEAM: &str = "undefined";

/// Build the key a format entry is stored under.
///
/// Without grouping this is the format name. With grouping the player's team
/// is appended (e.g., "ppr-KC"), which groups by real-world team rather than
/// league size.
pub fn format_key(format_name: &str, team: Option<&str>, group_by_team: bool) -> String {
    if group_by_team {
        format!("{}-{}", format_name, team.unwrap_or(UNKNOWN_TEAM))
    } else {
        format_name.to_string()
    }
}

/// One (source, format, league size) payload being folded into the matrix
#[derive(Debug, Clone)]
pub struct Dataset<'a> {
    pub source: &'a SourceSpec,
    pub format: &'a FormatSpec,
    pub teams: u32,
    domain: String,
}

impl<'a> Dataset<'a> {
    /// Resolve the source domain up front so ingestion itself cannot fail
    pub fn new(source: &'a SourceSpec, format: &'a FormatSpec, teams: u32) -> Result<Self> {
        let domain = source.domain()?;
        Ok(Self { source, format, teams, domain })
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }
}

/// Counts from folding one payload into the matrix
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Players in the payload
    pub total: usize,
    /// Players actually merged (the rest had no usable name)
    pub merged: usize,
}

/// Canonical name -> merged player record, in first-seen order.
///
/// Descriptive fields are first-write-wins: once a source sets `team`, no
/// later source or format can change it. Stats are keyed by format key and
/// source domain, and re-ingesting the same dataset overwrites in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerMatrix {
    players: IndexMap<String, PlayerRecord>,
}

impl PlayerMatrix {
    /// Create an empty matrix for a single run
    pub fn new() -> Self {
        Self { players: IndexMap::new() }
    }

    /// Merge one raw player. Returns false if the record had no usable name.
    pub fn ingest(&mut self, raw: &RawPlayer, dataset: &Dataset<'_>, group_by_team: bool) -> bool {
        let key = match raw.name() {
            Some(name) => normalize_name(name),
            None => String::new(),
        };

        if key.is_empty() {
            debug!("Skipping nameless player from {} {}", dataset.domain(), dataset.format.name);
            return false;
        }

        let record = self.players.entry(key.clone()).or_insert_with(|| PlayerRecord::new(key));

        for (field, value) in extract_fields(raw, &dataset.source.fields) {
            record.set_if_absent(&field, value);
        }

        let format_key = format_key(&dataset.format.name, record.team.as_deref(), group_by_team);
        let stats = SourceStats::from_raw(raw);
        let entry = record.formats.entry(format_key).or_insert_with(FormatEntry::empty);

        match entry {
            FormatEntry::Raw(by_domain) => {
                by_domain.insert(dataset.domain().to_string(), stats);
            }
            FormatEntry::Ranked(rank) => {
                let rank = *rank;
                warn!(
                    "Ingesting into already ranked format {} for {} (rank {}), resetting entry",
                    dataset.format.name, record.name, rank
                );
                let mut by_domain = IndexMap::new();
                by_domain.insert(dataset.domain().to_string(), stats);
                *entry = FormatEntry::Raw(by_domain);
            }
        }

        true
    }

    /// Merge every player of a payload
    pub fn ingest_payload(
        &mut self,
        payload: &PlayerPayload,
        dataset: &Dataset<'_>,
        group_by_team: bool,
    ) -> IngestStats {
        let mut stats = IngestStats { total: payload.players.len(), merged: 0 };

        for raw in &payload.players {
            if self.ingest(raw, dataset, group_by_team) {
                stats.merged += 1;
            }
        }

        debug!(
            "Merged {}/{} players from {} {} ({} teams)",
            stats.merged,
            stats.total,
            dataset.domain(),
            dataset.format.name,
            dataset.teams
        );

        stats
    }

    /// Get a player by canonical name (the name is normalized first)
    pub fn get(&self, name: &str) -> Option<&PlayerRecord> {
        self.players.get(&normalize_name(name))
    }

    /// Players in first-seen order
    pub fn players(&self) -> impl Iterator<Item = &PlayerRecord> {
        self.players.values()
    }

    pub fn players_mut(&mut self) -> impl Iterator<Item = &mut PlayerRecord> {
        self.players.values_mut()
    }

    pub(crate) fn get_index_mut(&mut self, index: usize) -> Option<&mut PlayerRecord> {
        self.players.get_index_mut(index).map(|(_, record)| record)
    }

    /// Number of unique players
    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
