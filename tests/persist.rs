use std::fs;

use tempfile::tempdir;

use party_time::demo::demo_snapshot;
use party_time::persist::{
    build_bundle, bundle_file_name, latest_bundle_path, read_bundle, write_bundle,
};
use party_time::ProjectionConfig;

#[test]
fn writes_season_file_and_latest_copy() {
    let dir = tempdir().expect("temp dir");
    let snap = demo_snapshot(9, 42);
    let projection = snap.project(&ProjectionConfig::default()).unwrap();
    let bundle = build_bundle(&snap, projection);

    let path = write_bundle(dir.path(), &bundle).expect("bundle written");
    assert_eq!(path, dir.path().join(bundle_file_name(0)));
    assert_eq!(bundle_file_name(12), "standings.12.json");

    let season = read_bundle(&path).unwrap();
    let latest = read_bundle(&latest_bundle_path(dir.path())).unwrap();
    assert_eq!(season, bundle);
    assert_eq!(latest, bundle);
    assert_eq!(latest.league, "Demo League");
    assert_eq!(latest.day, 42);
    assert!(latest.updated.ends_with('Z'));

    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn newer_season_replaces_latest_only() {
    let dir = tempdir().expect("temp dir");
    let config = ProjectionConfig::default();

    let old = demo_snapshot(1, 99);
    let old_bundle = build_bundle(&old, old.project(&config).unwrap());
    write_bundle(dir.path(), &old_bundle).unwrap();

    let mut new = demo_snapshot(2, 10);
    new.season = 1;
    let new_bundle = build_bundle(&new, new.project(&config).unwrap());
    write_bundle(dir.path(), &new_bundle).unwrap();

    let kept = read_bundle(&dir.path().join(bundle_file_name(0))).unwrap();
    assert_eq!(kept.day, 99);
    let latest = read_bundle(&latest_bundle_path(dir.path())).unwrap();
    assert_eq!(latest.season, 1);
    assert_eq!(latest.day, 10);
}

#[test]
fn creates_missing_output_dir() {
    let dir = tempdir().expect("temp dir");
    let nested = dir.path().join("out").join("bundles");
    let snap = demo_snapshot(3, 5);
    let bundle = build_bundle(&snap, snap.project(&ProjectionConfig::default()).unwrap());
    write_bundle(&nested, &bundle).unwrap();
    assert!(latest_bundle_path(&nested).exists());
}
