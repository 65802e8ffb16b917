use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::postseason::{PlayoffStandings, group_matchups};
use crate::projection::Projection;
use crate::snapshot::Snapshot;

const DATA_DIR: &str = "party_time";
const LATEST_FILE: &str = "standings.json";

/// What gets published for one poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bundle {
    pub updated: String,
    pub league: String,
    pub season: u32,
    pub day: u32,
    pub standings: Projection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postseason: Option<PlayoffStandings>,
}

pub fn build_bundle(snapshot: &Snapshot, standings: Projection) -> Bundle {
    Bundle {
        updated: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        league: snapshot.topology.name.clone(),
        season: snapshot.season,
        day: snapshot.day,
        standings,
        postseason: snapshot
            .postseason
            .as_ref()
            .map(|p| group_matchups(&snapshot.topology, p)),
    }
}

pub fn bundle_file_name(season: u32) -> String {
    format!("standings.{season}.json")
}

/// Writes `standings.<season>.json` and then swaps `standings.json` to the
/// same content. Both writes go through a temp file and a rename.
pub fn write_bundle(dir: &Path, bundle: &Bundle) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let json = serde_json::to_string(bundle).context("serialize bundle")?;

    let season_path = dir.join(bundle_file_name(bundle.season));
    write_atomic(&season_path, &json)?;
    write_atomic(&dir.join(LATEST_FILE), &json)?;
    Ok(season_path)
}

pub fn read_bundle(path: &Path) -> Result<Bundle> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&raw).context("invalid bundle json")
}

pub fn latest_bundle_path(dir: &Path) -> PathBuf {
    dir.join(LATEST_FILE)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, contents).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("swap {}", path.display()))?;
    Ok(())
}

pub fn default_out_dir() -> Option<PathBuf> {
    // Prefer XDG data.
    if let Ok(base) = std::env::var("XDG_DATA_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(DATA_DIR));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".local").join("share").join(DATA_DIR))
}
