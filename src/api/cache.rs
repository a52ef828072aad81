//! In-memory query cache with a staleness window
//!
//! Entries younger than `stale_after` are served without touching the network.
//! Entries older than `evict_after` are dropped by `sweep`. Failed fetches are
//! never stored, so a refresh always goes back to the API.

use std::hash::Hash;
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Default freshness window (60 minutes)
pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(60 * 60);

/// Default eviction window (65 minutes)
pub const DEFAULT_EVICT_AFTER: Duration = Duration::from_secs(65 * 60);

#[derive(Debug)]
struct Entry<V> {
    value: V,
    stored_at: Instant,
}

/// Keyed cache of fetched values.
///
/// Shared behind an `Arc` by concurrent fetch tasks. Shard guards are never
/// held across an await point.
#[derive(Debug)]
pub struct QueryCache<K: Eq + Hash, V> {
    entries: DashMap<K, Entry<V>>,
    stale_after: Duration,
    evict_after: Duration,
}

impl<K, V> Default for QueryCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new(DEFAULT_STALE_AFTER, DEFAULT_EVICT_AFTER)
    }
}

impl<K, V> QueryCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create a cache. `evict_after` is raised to `stale_after` if smaller.
    pub fn new(stale_after: Duration, evict_after: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            stale_after,
            evict_after: evict_after.max(stale_after),
        }
    }

    pub fn stale_after(&self) -> Duration {
        self.stale_after
    }

    pub fn evict_after(&self) -> Duration {
        self.evict_after
    }

    /// Fresh value for `key`, if any
    pub fn get_fresh(&self, key: &K) -> Option<V> {
        self.get_fresh_at(key, Instant::now())
    }

    /// Fresh value for `key` as seen at `now`
    pub fn get_fresh_at(&self, key: &K, now: Instant) -> Option<V> {
        self.entries.get(key).and_then(|entry| {
            let age = now.saturating_duration_since(entry.stored_at);
            (age < self.stale_after).then(|| entry.value.clone())
        })
    }

    /// Store a value fetched now
    pub fn insert(&self, key: K, value: V) {
        self.insert_at(key, value, Instant::now());
    }

    /// Store a value as fetched at `stored_at`
    pub fn insert_at(&self, key: K, value: V, stored_at: Instant) {
        self.entries.insert(key, Entry { value, stored_at });
    }

    /// Drop one entry so the next lookup refetches
    pub fn invalidate(&self, key: &K) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Drop entries older than the eviction window, returning how many went
    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    pub fn sweep_at(&self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.stored_at) < self.evict_after);
        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
