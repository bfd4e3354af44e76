//! End-to-end runs: ingest several sources, join ids, rank, serialize

use crate::{
    compute_rankings, join_espn_ids, Dataset, EspnIdIndex, FormatEntry, MatrixDocument,
    PlayerIdRecord, PlayerMatrix, PlayerPayload, SourceConfig,
};
use chrono::NaiveDate;
use serde_json::json;

fn config() -> SourceConfig {
    SourceConfig::from_json(
        r#"{"sources": [
            {
                "name": "Fantasy Football Calculator",
                "baseUrl": "https://fantasyfootballcalculator.com/api/v1/adp",
                "fields": ["team", "position", "bye"],
                "formats": [{"name": "standard", "teams": [12]}, {"name": "ppr", "teams": [12]}]
            },
            {
                "name": "Mock Draft Sim",
                "baseUrl": "https://mockdraft.example.com/api/adp",
                "fields": ["position", "team", "player_id"],
                "formats": [{"name": "ppr", "teams": [12]}]
            },
            {
                "name": "Retired Feed",
                "baseUrl": "https://old.example.com/adp",
                "skip": true,
                "fields": ["team"],
                "formats": [{"name": "ppr"}]
            }
        ]}"#,
    )
    .unwrap()
}

fn payload(source: usize, format: &str) -> PlayerPayload {
    let players = match (source, format) {
        (0, "standard") => json!([
            {"name": "Christian McCaffrey", "team": "SF", "position": "RB", "bye": 14, "adp": 1.3, "adp_formatted": "1.01", "high": 1, "low": 3, "stdev": 0.5, "times_drafted": 300},
            {"name": "Justin Jefferson", "team": "MIN", "position": "WR", "bye": 6, "adp": 3.0},
            {"name": "Derrick  Henry", "team": "BAL", "position": "RB", "bye": 14, "adp": 9.4}
        ]),
        (0, "ppr") => json!([
            {"name": "Justin Jefferson", "team": "MIN", "position": "WR", "adp": 2.1},
            {"name": "Christian McCaffrey", "team": "SF", "position": "RB", "adp": 2.1}
        ]),
        (1, "ppr") => json!([
            {"name": " Christian McCaffrey", "team": "SFO", "position": "RB", "player_id": 77, "adp": 1.8},
            {"name": "Puka Nacua", "team": "LAR", "position": "WR", "player_id": 90, "adp": 8.2}
        ]),
        _ => json!([]),
    };
    serde_json::from_value(json!({ "players": players })).unwrap()
}

fn run(verbose: bool) -> PlayerMatrix {
    let config = config();
    let mut matrix = PlayerMatrix::new();

    for (index, source) in config.sources.iter().enumerate() {
        if source.skip {
            continue;
        }
        for format in &source.formats {
            for teams in format.team_sizes() {
                let dataset = Dataset::new(source, format, teams).unwrap();
                matrix.ingest_payload(&payload(index, &format.name), &dataset, false);
            }
        }
    }

    let index = EspnIdIndex::from_records(&[
        PlayerIdRecord {
            espn_name: Some("Christian McCaffrey".to_string()),
            espn_id: Some(json!("3117251")),
        },
        PlayerIdRecord { espn_name: Some("Puka Nacua".to_string()), espn_id: Some(json!("NULL")) },
    ]);
    join_espn_ids(&mut matrix, &index);
    compute_rankings(&mut matrix, verbose);
    matrix
}

#[test]
fn test_full_compile_run() {
    let matrix = run(false);
    assert_eq!(matrix.len(), 4);

    let cmc = matrix.get("Christian McCaffrey").unwrap();
    assert_eq!(cmc.team.as_deref(), Some("SF"));
    assert_eq!(cmc.espn_id.as_deref(), Some("3117251"));
    assert_eq!(cmc.extra["bye"], json!(14));
    assert_eq!(cmc.extra["player_id"], json!(77));
    assert_eq!(cmc.formats["standard"], FormatEntry::Ranked(1));
    // best ppr adp 1.8 beats Jefferson's 2.1
    assert_eq!(cmc.formats["ppr"], FormatEntry::Ranked(1));

    let jefferson = matrix.get("Justin Jefferson").unwrap();
    assert_eq!(jefferson.formats["ppr"], FormatEntry::Ranked(2));
    assert_eq!(jefferson.formats["standard"], FormatEntry::Ranked(2));

    let henry = matrix.get("Derrick Henry").unwrap();
    assert_eq!(henry.formats["standard"], FormatEntry::Ranked(3));
    assert!(!henry.formats.contains_key("ppr"));

    let nacua = matrix.get("Puka Nacua").unwrap();
    assert_eq!(nacua.espn_id, None);
    assert_eq!(nacua.formats["ppr"], FormatEntry::Ranked(3));
}

#[test]
fn test_full_run_document() {
    let matrix = run(false);
    let date = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
    let document = MatrixDocument::build(&matrix, date, config().sources.len());

    assert_eq!(document.sources, 3);
    assert_eq!(document.total_players, 4);

    let names: Vec<_> =
        document.players.iter().map(|p| p["name"].as_str().unwrap().to_string()).collect();
    assert_eq!(names, vec!["Christian McCaffrey", "Justin Jefferson", "Derrick Henry", "Puka Nacua"]);

    let json = document.to_json_pretty().unwrap();
    assert_eq!(json, MatrixDocument::build(&matrix, date, 3).to_json_pretty().unwrap());
}

#[test]
fn test_verbose_run_keeps_every_source() {
    let matrix = run(true);
    let cmc = matrix.get("Christian McCaffrey").unwrap();

    match &cmc.formats["ppr"] {
        FormatEntry::Raw(by_domain) => {
            assert_eq!(by_domain.len(), 2);
            assert_eq!(by_domain["fantasyfootballcalculator.com"].adp, Some(2.1));
            assert_eq!(by_domain["mockdraft.example.com"].adp, Some(1.8));
        }
        other => panic!("expected raw entry, got {other:?}"),
    }

    match &cmc.formats["standard"] {
        FormatEntry::Raw(by_domain) => {
            let stats = &by_domain["fantasyfootballcalculator.com"];
            assert_eq!(stats.adp_formatted.as_deref(), Some("1.01"));
            assert_eq!(stats.times_drafted, Some(300));
        }
        other => panic!("expected raw entry, got {other:?}"),
    }
}
