use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::league::LeagueId;
use crate::projection::Projection;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub league: LeagueId,
    pub season: u32,
    pub day: u32,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    projection: Projection,
    stored_at: Instant,
}

/// Memoized projections owned by whoever polls the feed. Projections are
/// pure, so a hit is only ever stale because the feed moved on.
#[derive(Debug, Clone)]
pub struct ProjectionCache {
    ttl: Duration,
    entries: HashMap<CacheKey, CacheEntry>,
}

impl ProjectionCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<&Projection> {
        self.entries
            .get(key)
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| &entry.projection)
    }

    pub fn insert(&mut self, key: CacheKey, projection: Projection) {
        self.entries.insert(
            key,
            CacheEntry {
                projection,
                stored_at: Instant::now(),
            },
        );
    }

    pub fn get_or_try_insert_with<E, F>(&mut self, key: CacheKey, compute: F) -> Result<&Projection, E>
    where
        F: FnOnce() -> Result<Projection, E>,
    {
        if self.get(&key).is_none() {
            let projection = compute()?;
            self.insert(key.clone(), projection);
        }
        Ok(&self.entries[&key].projection)
    }

    /// Drops expired entries, returning how many were removed.
    pub fn evict_expired(&mut self) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries.retain(|_, entry| entry.stored_at.elapsed() < ttl);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
