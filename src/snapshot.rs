use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::cache::CacheKey;
use crate::error::ProjectError;
use crate::http_cache::HttpCache;
use crate::http_client::http_client;
use crate::league::{LeagueTopology, Standings};
use crate::postseason::PostseasonSnapshot;
use crate::projection::{Projection, ProjectionConfig, project_with};

/// One poll of the league: membership, standings and sim clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub season: u32,
    /// 0-indexed game day.
    pub day: u32,
    pub topology: LeagueTopology,
    #[serde(default)]
    pub standings: Standings,
    #[serde(default)]
    pub postseason: Option<PostseasonSnapshot>,
}

impl Snapshot {
    pub fn cache_key(&self) -> CacheKey {
        CacheKey {
            league: self.topology.id.clone(),
            season: self.season,
            day: self.day,
        }
    }

    pub fn project(&self, config: &ProjectionConfig) -> Result<Projection, ProjectError> {
        project_with(&self.topology, &self.standings, self.day, config)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loaded {
    pub snapshot: Snapshot,
    pub modified: bool,
}

pub fn parse_snapshot_json(raw: &str) -> Result<Snapshot> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        bail!("empty snapshot");
    }
    serde_json::from_str(trimmed).context("invalid snapshot json")
}

pub fn read_snapshot(path: &Path) -> Result<Snapshot> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read snapshot {}", path.display()))?;
    parse_snapshot_json(&raw)
}

pub fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Reads `source` from disk, or over HTTP when it looks like a URL.
pub fn load_snapshot(source: &str, http: &mut HttpCache) -> Result<Loaded> {
    if !is_url(source) {
        let snapshot = read_snapshot(Path::new(source))?;
        return Ok(Loaded {
            snapshot,
            modified: true,
        });
    }
    let client = http_client()?;
    let fetched = http.fetch(client, source)?;
    let snapshot = parse_snapshot_json(&fetched.body)?;
    Ok(Loaded {
        snapshot,
        modified: fetched.modified,
    })
}
