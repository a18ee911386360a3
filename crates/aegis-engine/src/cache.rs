//! Resolution cache
//!
//! Memoizes effective-role resolution per `"{principal}:{resource}"` key.
//! Entries hold role ids, not role bodies, so a hit always re-reads the live
//! role table and clearing the cache can never change a decision, only its
//! latency. Expiry happens on read; mutations invalidate by principal prefix.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Cache performance counters
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    /// Lookups answered from cache
    pub hits: u64,
    /// Lookups that fell through to a full resolution
    pub misses: u64,
    /// Entries currently held (expired-but-unread included)
    pub entries: usize,
}

#[derive(Debug)]
struct CacheEntry {
    role_ids: Vec<String>,
    cached_at: Instant,
}

/// TTL-bounded memo of resolved role-id lists
#[derive(Debug)]
pub(crate) struct ResolutionCache {
    ttl: Duration,
    entries: DashMap<String, CacheEntry>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResolutionCache {
    pub(crate) fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub(crate) fn key(principal_id: &str, resource: &str) -> String {
        format!("{principal_id}:{resource}")
    }

    pub(crate) fn get(&self, key: &str) -> Option<Vec<String>> {
        let expired = match self.entries.get(key) {
            Some(entry) if entry.cached_at.elapsed() < self.ttl => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(entry.role_ids.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.remove(key);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    pub(crate) fn insert(&self, key: String, role_ids: Vec<String>) {
        self.entries.insert(
            key,
            CacheEntry {
                role_ids,
                cached_at: Instant::now(),
            },
        );
    }

    /// Drop every entry belonging to `principal_id`
    pub(crate) fn invalidate_principal(&self, principal_id: &str) {
        let prefix = format!("{principal_id}:");
        self.entries.retain(|key, _| !key.starts_with(&prefix));
    }

    pub(crate) fn clear(&self) {
        self.entries.clear();
    }

    pub(crate) fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn miss_then_hit() {
        let cache = ResolutionCache::new(Duration::from_secs(60));
        let key = ResolutionCache::key("u1", "project/x");

        assert!(cache.get(&key).is_none());
        cache.insert(key.clone(), ids(&["developer"]));
        assert_eq!(cache.get(&key), Some(ids(&["developer"])));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
    }

    #[test]
    fn zero_ttl_never_hits() {
        let cache = ResolutionCache::new(Duration::ZERO);
        let key = ResolutionCache::key("u1", "r");
        cache.insert(key.clone(), ids(&["viewer"]));
        assert!(cache.get(&key).is_none());
        assert_eq!(cache.stats().entries, 0);
    }

    #[test]
    fn prefix_invalidation_is_per_principal() {
        let cache = ResolutionCache::new(Duration::from_secs(60));
        cache.insert(ResolutionCache::key("u1", "a"), ids(&["viewer"]));
        cache.insert(ResolutionCache::key("u1", "b"), ids(&["viewer"]));
        cache.insert(ResolutionCache::key("u2", "a"), ids(&["admin"]));

        cache.invalidate_principal("u1");

        assert!(cache.get(&ResolutionCache::key("u1", "a")).is_none());
        assert!(cache.get(&ResolutionCache::key("u1", "b")).is_none());
        assert!(cache.get(&ResolutionCache::key("u2", "a")).is_some());
    }

    #[test]
    fn clear_empties_everything() {
        let cache = ResolutionCache::new(Duration::from_secs(60));
        cache.insert(ResolutionCache::key("u1", "a"), ids(&["viewer"]));
        cache.clear();
        assert_eq!(cache.stats().entries, 0);
    }
}
