use std::cell::Cell;
use std::time::Duration;

use party_time::cache::{CacheKey, ProjectionCache};
use party_time::demo::demo_snapshot;
use party_time::{ProjectError, Projection, ProjectionConfig};

fn key(day: u32) -> CacheKey {
    CacheKey {
        league: "demo".into(),
        season: 3,
        day,
    }
}

fn demo_projection(day: u32) -> Projection {
    demo_snapshot(5, day)
        .project(&ProjectionConfig::default())
        .expect("demo league projects")
}

#[test]
fn hit_within_ttl_skips_recompute() {
    let mut cache = ProjectionCache::new(Duration::from_secs(600));
    let calls = Cell::new(0);
    let compute = || {
        calls.set(calls.get() + 1);
        Ok::<_, ProjectError>(demo_projection(30))
    };

    let first = cache.get_or_try_insert_with(key(30), compute).unwrap().clone();
    let second = cache
        .get_or_try_insert_with(key(30), || {
            calls.set(calls.get() + 1);
            Ok::<_, ProjectError>(Projection::default())
        })
        .unwrap()
        .clone();
    assert_eq!(calls.get(), 1);
    assert_eq!(first, second);
    assert_eq!(cache.len(), 1);
}

#[test]
fn days_are_cached_separately() {
    let mut cache = ProjectionCache::new(Duration::from_secs(600));
    cache.insert(key(30), demo_projection(30));
    cache.insert(key(31), demo_projection(31));
    assert_eq!(cache.len(), 2);
    assert_ne!(cache.get(&key(30)), cache.get(&key(31)));

    let other_season = CacheKey {
        season: 4,
        ..key(30)
    };
    assert!(cache.get(&other_season).is_none());
}

#[test]
fn zero_ttl_never_hits() {
    let mut cache = ProjectionCache::new(Duration::ZERO);
    cache.insert(key(10), demo_projection(10));
    assert!(cache.get(&key(10)).is_none());

    let calls = Cell::new(0);
    for _ in 0..3 {
        cache
            .get_or_try_insert_with(key(10), || {
                calls.set(calls.get() + 1);
                Ok::<_, ProjectError>(Projection::default())
            })
            .unwrap();
    }
    assert_eq!(calls.get(), 3);
    assert_eq!(cache.evict_expired(), 1);
    assert!(cache.is_empty());
}

#[test]
fn failed_compute_is_not_cached() {
    let mut cache = ProjectionCache::new(Duration::from_secs(600));
    let err = cache
        .get_or_try_insert_with(key(1), || {
            Err(ProjectError::MissingStandings("ghost".into()))
        })
        .unwrap_err();
    assert_eq!(err, ProjectError::MissingStandings("ghost".into()));
    assert!(cache.is_empty());
}
