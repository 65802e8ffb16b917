use std::fs;
use std::path::PathBuf;

use party_time::http_cache::HttpCache;
use party_time::snapshot::{is_url, load_snapshot, parse_snapshot_json, read_snapshot};

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

#[test]
fn parses_midseason_fixture() {
    let snap = read_snapshot(&fixture_path("snapshot_midseason.json")).expect("fixture should parse");
    assert_eq!(snap.season, 11);
    assert_eq!(snap.day, 69);
    assert_eq!(snap.topology.subleagues.len(), 2);
    assert_eq!(snap.topology.teams.len(), 21);
    assert_eq!(snap.topology.tiebreakers.len(), 20);
    assert!(snap.postseason.is_none());

    let key = snap.cache_key();
    assert_eq!(key.league.0, "fixture");
    assert_eq!((key.season, key.day), (11, 69));

    // Optional team fields default.
    let bench = snap.topology.team(&"bench".into()).unwrap();
    assert_eq!(bench.championships, 0);
}

#[test]
fn empty_and_null_bodies_are_errors() {
    assert!(parse_snapshot_json("").is_err());
    assert!(parse_snapshot_json("  \n").is_err());
    let err = parse_snapshot_json("null").unwrap_err();
    assert!(err.to_string().contains("empty snapshot"));
}

#[test]
fn malformed_json_is_an_error() {
    let err = parse_snapshot_json("{\"season\": 1").unwrap_err();
    assert!(format!("{err:#}").contains("invalid snapshot json"));
}

#[test]
fn unknown_fields_are_ignored() {
    let raw = fs::read_to_string(fixture_path("snapshot_midseason.json")).unwrap();
    let mut value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    value["weather"] = serde_json::json!("Blooddrain");
    let snap = parse_snapshot_json(&value.to_string()).unwrap();
    assert_eq!(snap.day, 69);
}

#[test]
fn file_sources_always_count_as_modified() {
    let path = fixture_path("snapshot_midseason.json");
    let source = path.to_string_lossy();
    assert!(!is_url(&source));
    assert!(is_url("https://example.com/snapshot.json"));

    let mut http = HttpCache::new();
    let first = load_snapshot(&source, &mut http).unwrap();
    let second = load_snapshot(&source, &mut http).unwrap();
    assert!(first.modified && second.modified);
    assert_eq!(first.snapshot, second.snapshot);
}

#[test]
fn missing_file_reports_path() {
    let err = read_snapshot(&fixture_path("nope.json")).unwrap_err();
    assert!(err.to_string().contains("nope.json"));
}
