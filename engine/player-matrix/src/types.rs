use crate::error::{MatrixError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use url::Url;

/// League sizes queried when a format does not list its own
pub const DEFAULT_TEAM_SIZES: [u32; 4] = [8, 10, 12, 14];

/// Top-level shape of `sources.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub sources: Vec<SourceSpec>,
}

impl SourceConfig {
    /// Parse a source configuration document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A mock-draft data source and the fields to take from it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSpec {
    /// Display name (e.g., "Fantasy Football Calculator")
    pub name: String,

    /// API root, formats are appended as path segments
    pub base_url: String,

    /// Excluded sources are never fetched nor merged
    #[serde(default)]
    pub skip: bool,

    /// Descriptive player fields to copy, in precedence order
    #[serde(default)]
    pub fields: Vec<String>,

    /// Scoring formats published by this source
    #[serde(default)]
    pub formats: Vec<FormatSpec>,
}

impl SourceSpec {
    /// Host name of the base URL, used to label this source's stats
    pub fn domain(&self) -> Result<String> {
        let url = Url::parse(&self.base_url).map_err(|e| MatrixError::InvalidSourceUrl {
            name: self.name.clone(),
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;

        url.host_str().map(str::to_string).ok_or_else(|| MatrixError::MissingHost {
            name: self.name.clone(),
            url: self.base_url.clone(),
        })
    }
}

/// A scoring format and the league sizes to request it for
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatSpec {
    /// Format name as used in the source URL (e.g., "ppr", "half-ppr")
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teams: Option<Vec<u32>>,
}

impl FormatSpec {
    /// League sizes to request, falling back to [`DEFAULT_TEAM_SIZES`]
    pub fn team_sizes(&self) -> Vec<u32> {
        match &self.teams {
            Some(teams) => teams.clone(),
            None => DEFAULT_TEAM_SIZES.to_vec(),
        }
    }
}

/// One player as published by a source, with whatever keys it chose
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawPlayer(pub Map<String, Value>);

impl RawPlayer {
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }
}

impl From<Value> for RawPlayer {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => RawPlayer(map),
            _ => RawPlayer::default(),
        }
    }
}

/// Payload for a single (source, format, league size) request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerPayload {
    #[serde(default)]
    pub players: Vec<RawPlayer>,
}

impl PlayerPayload {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Draft statistics one source reports for one player in one format
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adp: Option<f64>,

    /// Round.pick rendering of the ADP (e.g., "1.04")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adp_formatted: Option<String>,

    /// Earliest pick observed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,

    /// Latest pick observed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stdev: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub times_drafted: Option<u64>,
}

impl SourceStats {
    /// Read the stat fields from a raw player, tolerating strings for numbers
    pub fn from_raw(raw: &RawPlayer) -> Self {
        Self {
            adp: raw.get("adp").and_then(as_number),
            adp_formatted: raw.get("adp_formatted").and_then(as_text),
            high: raw.get("high").and_then(as_number),
            low: raw.get("low").and_then(as_number),
            stdev: raw.get("stdev").and_then(as_number),
            times_drafted: raw.get("times_drafted").and_then(as_number).map(|n| n as u64),
        }
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

pub(crate) fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// What a player holds for one format key.
///
/// A run produces either raw entries (verbose) or ranks, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormatEntry {
    /// 1-based rank within the format key
    Ranked(u32),

    /// Stats per source domain, in first-seen order
    Raw(IndexMap<String, SourceStats>),
}

impl FormatEntry {
    pub fn empty() -> Self {
        FormatEntry::Raw(IndexMap::new())
    }

    /// Value the aggregator sorts on.
    ///
    /// Raw entries use the lowest ADP any source reports. A collapsed entry
    /// keeps its rank, so ranking a matrix twice leaves it unchanged.
    pub fn ranking_score(&self) -> Option<f64> {
        match self {
            FormatEntry::Ranked(rank) => Some(f64::from(*rank)),
            FormatEntry::Raw(by_domain) => {
                by_domain.values().filter_map(|stats| stats.adp).reduce(f64::min)
            }
        }
    }

    pub fn rank(&self) -> Option<u32> {
        match self {
            FormatEntry::Ranked(rank) => Some(*rank),
            FormatEntry::Raw(_) => None,
        }
    }

    pub fn is_ranked(&self) -> bool {
        matches!(self, FormatEntry::Ranked(_))
    }
}

/// Merged record for one player across every source and format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Canonical name, also the matrix key
    pub name: String,

    /// Team abbreviation (e.g., "CIN")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,

    /// Position (QB, RB, WR, TE, PK, DEF)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,

    /// ESPN player id, used for headshots
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub espn_id: Option<String>,

    /// Any other source-declared field, in first-seen order
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,

    /// Format key -> entry
    pub formats: IndexMap<String, FormatEntry>,
}

impl PlayerRecord {
    /// Create an empty record for a canonical name
    pub fn new(name: String) -> Self {
        Self {
            name,
            team: None,
            position: None,
            espn_id: None,
            extra: IndexMap::new(),
            formats: IndexMap::new(),
        }
    }

    /// Whether a field already holds a value. `name` and `formats` always do.
    pub fn has_field(&self, field: &str) -> bool {
        match field {
            "name" | "formats" => true,
            "team" => self.team.is_some(),
            "position" => self.position.is_some(),
            "espn_id" => self.espn_id.is_some(),
            other => self.extra.contains_key(other),
        }
    }

    /// Set a field unless it is already populated. Returns whether it was set.
    pub fn set_if_absent(&mut self, field: &str, value: Value) -> bool {
        if self.has_field(field) {
            return false;
        }

        let slot = match field {
            "team" => &mut self.team,
            "position" => &mut self.position,
            "espn_id" => &mut self.espn_id,
            other => {
                self.extra.insert(other.to_string(), value);
                return true;
            }
        };

        match as_text(&value) {
            Some(text) => {
                *slot = Some(text);
                true
            }
            None => false,
        }
    }

    /// Read any field, well-known or dynamic, as JSON
    pub fn field(&self, field: &str) -> Option<Value> {
        match field {
            "name" => Some(Value::String(self.name.clone())),
            "team" => self.team.clone().map(Value::String),
            "position" => self.position.clone().map(Value::String),
            "espn_id" => self.espn_id.clone().map(Value::String),
            "formats" => serde_json::to_value(&self.formats).ok(),
            other => self.extra.get(other).cloned(),
        }
    }

    /// All populated keys with their values, sorted alphabetically
    pub fn sorted_fields(&self) -> BTreeMap<String, Value> {
        let mut sorted = BTreeMap::new();
        sorted.insert("name".to_string(), Value::String(self.name.clone()));

        if let Some(team) = &self.team {
            sorted.insert("team".to_string(), Value::String(team.clone()));
        }
        if let Some(position) = &self.position {
            sorted.insert("position".to_string(), Value::String(position.clone()));
        }
        if let Some(espn_id) = &self.espn_id {
            sorted.insert("espn_id".to_string(), Value::String(espn_id.clone()));
        }
        for (key, value) in &self.extra {
            sorted.insert(key.clone(), value.clone());
        }

        let formats: Map<String, Value> = self
            .formats
            .iter()
            .map(|(key, entry)| (key.clone(), format_entry_value(entry)))
            .collect();
        sorted.insert("formats".to_string(), Value::Object(formats));

        sorted
    }
}

fn format_entry_value(entry: &FormatEntry) -> Value {
    match entry {
        FormatEntry::Ranked(rank) => Value::from(*rank),
        FormatEntry::Raw(by_domain) => {
            let map: Map<String, Value> = by_domain
                .iter()
                .map(|(domain, stats)| {
                    (domain.clone(), serde_json::to_value(stats).unwrap_or(Value::Null))
                })
                .collect();
            Value::Object(map)
        }
    }
}
