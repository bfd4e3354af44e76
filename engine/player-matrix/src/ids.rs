use crate::matrix::PlayerMatrix;
use crate::normalize::normalize_name;
use crate::types::as_text;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::info;

/// Sentinel the ID dataset uses for "no id"
pub const NULL_ID: &str = "NULL";

/// One row of the cross-reference player ID dataset.
///
/// The dataset carries ids for many sites; only the ESPN columns are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerIdRecord {
    #[serde(default)]
    pub espn_name: Option<String>,

    #[serde(default)]
    pub espn_id: Option<Value>,
}

impl PlayerIdRecord {
    /// The ESPN id, unless missing, blank or the `"NULL"` sentinel
    pub fn espn_id(&self) -> Option<String> {
        self.espn_id
            .as_ref()
            .and_then(as_text)
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty() && id != NULL_ID)
    }
}

/// Normalized ESPN name -> ESPN id
#[derive(Debug, Clone, Default)]
pub struct EspnIdIndex {
    by_name: HashMap<String, String>,
}

impl EspnIdIndex {
    /// Build the index. The first row wins when names collide.
    pub fn from_records(records: &[PlayerIdRecord]) -> Self {
        let mut by_name = HashMap::new();

        for record in records {
            let Some(name) = record.espn_name.as_deref().map(normalize_name) else {
                continue;
            };
            let Some(id) = record.espn_id() else {
                continue;
            };
            if name.is_empty() {
                continue;
            }

            by_name.entry(name).or_insert(id);
        }

        Self { by_name }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.by_name.get(&normalize_name(name)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Attach ESPN ids to players that lack one. Returns how many were set.
pub fn join_espn_ids(matrix: &mut PlayerMatrix, index: &EspnIdIndex) -> usize {
    let mut matched = 0;

    for player in matrix.players_mut() {
        if player.espn_id.is_some() {
            continue;
        }

        if let Some(id) = index.get(&player.name) {
            player.espn_id = Some(id.to_string());
            matched += 1;
        }
    }

    info!("Mapped {} ESPN IDs from {} known players", matched, index.len());
    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::Dataset;
    use crate::types::{FormatSpec, RawPlayer, SourceSpec};
    use serde_json::json;

    fn id_record(name: &str, id: Value) -> PlayerIdRecord {
        PlayerIdRecord { espn_name: Some(name.to_string()), espn_id: Some(id) }
    }

    fn matrix_with(players: &[serde_json::Value]) -> PlayerMatrix {
        let source = SourceSpec {
            name: "A".to_string(),
            base_url: "https://a.example.com/adp".to_string(),
            skip: false,
            fields: vec!["team".to_string(), "espn_id".to_string()],
            formats: vec![],
        };
        let ppr = FormatSpec { name: "ppr".to_string(), teams: None };
        let dataset = Dataset::new(&source, &ppr, 12).unwrap();

        let mut matrix = PlayerMatrix::new();
        for player in players {
            matrix.ingest(&RawPlayer::from(player.clone()), &dataset, false);
        }
        matrix
    }

    #[test]
    fn test_null_sentinel_is_skipped() {
        let index = EspnIdIndex::from_records(&[
            id_record("Brock Bowers", json!("NULL")),
            id_record("Malik Nabers", json!("")),
            PlayerIdRecord { espn_name: Some("Rome Odunze".to_string()), espn_id: None },
            id_record("Nico Collins", json!("4258173")),
        ]);

        assert_eq!(index.len(), 1);
        assert_eq!(index.get("Brock Bowers"), None);
        assert_eq!(index.get("Nico  Collins "), Some("4258173"));
    }

    #[test]
    fn test_first_duplicate_wins() {
        let index = EspnIdIndex::from_records(&[
            id_record("Mike Williams", json!("2977")),
            id_record("Mike  Williams", json!("3120")),
        ]);
        assert_eq!(index.get("Mike Williams"), Some("2977"));
    }

    #[test]
    fn test_numeric_ids_are_accepted() {
        let index = EspnIdIndex::from_records(&[id_record("Derrick Henry", json!(3043078))]);
        assert_eq!(index.get("Derrick Henry"), Some("3043078"));
    }

    #[test]
    fn test_join_never_overwrites() {
        let mut matrix = matrix_with(&[
            json!({"name": "Kyren Williams", "espn_id": "4430737", "adp": 20.0}),
            json!({"name": "Jahmyr Gibbs", "adp": 8.0}),
            json!({"name": "Unknown Rookie", "adp": 200.0}),
        ]);
        let index = EspnIdIndex::from_records(&[
            id_record("Kyren Williams", json!("999")),
            id_record("Jahmyr Gibbs", json!("4429795")),
        ]);

        let matched = join_espn_ids(&mut matrix, &index);

        assert_eq!(matched, 1);
        assert_eq!(matrix.get("Kyren Williams").unwrap().espn_id.as_deref(), Some("4430737"));
        assert_eq!(matrix.get("Jahmyr Gibbs").unwrap().espn_id.as_deref(), Some("4429795"));
        assert_eq!(matrix.get("Unknown Rookie").unwrap().espn_id, None);
    }

    #[test]
    fn test_deserializes_flat_rows() {
        let rows: Vec<PlayerIdRecord> = serde_json::from_value(json!([
            {"mfl_id": "13604", "espn_name": "Josh Jacobs", "espn_id": "4047365", "sleeper_id": "5850"},
            {"mfl_id": "1", "espn_name": null, "espn_id": null}
        ]))
        .unwrap();

        let index = EspnIdIndex::from_records(&rows);
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("Josh Jacobs"), Some("4047365"));
    }
}
