//! Generator result cache.
//!
//! Keyed store of the last successful output of each generator invocation.
//! Consulted only when a generator exceeds its deadline, so a transient
//! upstream stall does not break a dashboard render; any other failure
//! bypasses the cache and surfaces to the user.

use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::config::schema::GeneratedTile;

/// Time a cached generator result stays servable.
pub const DEFAULT_TTL: Duration = Duration::from_secs(120);

/// Entry budget before the stalest entry is evicted.
pub const DEFAULT_CAPACITY: usize = 256;

struct Entry {
    tiles: Vec<GeneratedTile>,
    refreshed_at: Instant,
}

/// Concurrent TTL + capacity bounded store of generator outputs.
pub struct GeneratorResultCache {
    entries: DashMap<String, Entry>,
    ttl: Duration,
    capacity: usize,
}

impl Default for GeneratorResultCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL, DEFAULT_CAPACITY)
    }
}

impl GeneratorResultCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            capacity,
        }
    }

    /// Store a successful generator output, refreshing its TTL.
    pub fn put(&self, key: &str, tiles: Vec<GeneratedTile>) {
        self.entries.insert(
            key.to_string(),
            Entry {
                tiles,
                refreshed_at: Instant::now(),
            },
        );
        if self.entries.len() > self.capacity {
            self.evict_stalest();
        }
    }

    /// Fetch a still-fresh output; expired entries are dropped on read.
    pub fn get(&self, key: &str) -> Option<Vec<GeneratedTile>> {
        let expired = match self.entries.get(key) {
            Some(entry) if entry.refreshed_at.elapsed() < self.ttl => {
                return Some(entry.tiles.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.remove(key);
        }
        None
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn evict_stalest(&self) {
        let stalest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.refreshed_at)
            .map(|entry| entry.key().clone());
        if let Some(key) = stalest {
            tracing::debug!(key = %key, "evicting stalest generator result");
            self.entries.remove(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn tile(job: &str) -> GeneratedTile {
        let mut params = Map::new();
        params.insert("job".to_string(), job.into());
        GeneratedTile {
            label: None,
            params,
            config_variant: None,
        }
    }

    #[test]
    fn test_put_then_get() {
        let cache = GeneratorResultCache::default();
        cache.put("key", vec![tile("test")]);

        let hit = cache.get("key").unwrap();
        assert_eq!(hit.len(), 1);
        assert_eq!(hit[0].params.get("job").unwrap(), "test");
        assert!(cache.get("other").is_none());
    }

    #[test]
    fn test_expired_entry_misses_and_is_dropped() {
        let cache = GeneratorResultCache::new(Duration::ZERO, DEFAULT_CAPACITY);
        cache.put("key", vec![tile("test")]);

        assert!(cache.get("key").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_put_refreshes_existing_key() {
        let cache = GeneratorResultCache::default();
        cache.put("key", vec![tile("old")]);
        cache.put("key", vec![tile("new"), tile("newer")]);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("key").unwrap().len(), 2);
    }

    #[test]
    fn test_capacity_eviction_drops_stalest() {
        let cache = GeneratorResultCache::new(DEFAULT_TTL, 2);
        cache.put("first", vec![tile("a")]);
        cache.put("second", vec![tile("b")]);
        cache.put("third", vec![tile("c")]);

        assert_eq!(cache.len(), 2);
        assert!(cache.get("first").is_none());
        assert!(cache.get("second").is_some());
        assert!(cache.get("third").is_some());
    }
}
