use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Result, anyhow};
use tracing::debug;

use crate::cache::ProjectionCache;
use crate::http_cache::HttpCache;
use crate::persist::build_bundle;
use crate::projection::ProjectionConfig;
use crate::snapshot::{Loaded, load_snapshot};
use crate::state::{Delta, ProviderCommand};

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub source: String,
    pub poll: Duration,
    pub cache_ttl: Duration,
    pub projection: ProjectionConfig,
}

impl ProviderConfig {
    /// Intervals come from `PARTY_POLL_SECS` (default 60, min 10) and
    /// `PARTY_CACHE_TTL_SECS` (default 60).
    pub fn from_env(source: String, projection: ProjectionConfig) -> Self {
        Self {
            source,
            poll: Duration::from_secs(env_secs("PARTY_POLL_SECS", 60).max(10)),
            cache_ttl: Duration::from_secs(env_secs("PARTY_CACHE_TTL_SECS", 60)),
            projection,
        }
    }
}

fn env_secs(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|val| val.parse::<u64>().ok())
        .unwrap_or(default)
}

pub fn spawn_provider(
    config: ProviderConfig,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut http = HttpCache::new();
        let mut cache = ProjectionCache::new(config.cache_ttl);

        loop {
            if let Err(err) = poll_once(&config, &mut http, &mut cache, &tx) {
                if tx
                    .send(Delta::Log(format!("[WARN] Snapshot poll error: {err:#}")))
                    .is_err()
                {
                    break;
                }
            }
            let evicted = cache.evict_expired();
            if evicted > 0 {
                debug!(evicted, "expired cached projections");
            }

            match cmd_rx.recv_timeout(config.poll) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(ProviderCommand::Stop) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}

/// One fetch-project-send cycle.
pub fn poll_once(
    config: &ProviderConfig,
    http: &mut HttpCache,
    cache: &mut ProjectionCache,
    tx: &Sender<Delta>,
) -> Result<()> {
    let loaded = load_snapshot(&config.source, http)?;
    publish_loaded(config, loaded, cache, tx)
}

/// Projects a loaded snapshot and sends it as a bundle. A changed body is
/// always re-projected, even for a day already cached; an unmodified body
/// with a fresh cache entry sends nothing.
pub fn publish_loaded(
    config: &ProviderConfig,
    loaded: Loaded,
    cache: &mut ProjectionCache,
    tx: &Sender<Delta>,
) -> Result<()> {
    let snapshot = loaded.snapshot;
    let key = snapshot.cache_key();
    let projection = if loaded.modified {
        let projection = snapshot.project(&config.projection)?;
        cache.insert(key.clone(), projection.clone());
        projection
    } else {
        if cache.get(&key).is_some() {
            debug!(day = key.day, "snapshot unchanged");
            return Ok(());
        }
        cache
            .get_or_try_insert_with(key.clone(), || snapshot.project(&config.projection))?
            .clone()
    };

    let bundle = build_bundle(&snapshot, projection);
    tx.send(Delta::Bundle { key, bundle })
        .map_err(|_| anyhow!("state channel closed"))?;
    Ok(())
}
