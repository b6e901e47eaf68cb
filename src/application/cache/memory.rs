//! In-memory cache provider

use dashmap::DashMap;

use super::{CacheProvider, CacheRegion, CachedValue};

/// Process-local cache keyed by `(region, key)`.
#[derive(Default)]
pub struct InMemoryCache {
    entries: DashMap<(CacheRegion, String), CachedValue>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CacheProvider for InMemoryCache {
    fn get(&self, region: CacheRegion, key: &str) -> Option<CachedValue> {
        let hit = self
            .entries
            .get(&(region, key.to_string()))
            .map(|entry| entry.value().clone());

        if hit.is_some() {
            metrics::counter!("settings_cache_hits_total", "region" => region.name()).increment(1);
        } else {
            metrics::counter!("settings_cache_misses_total", "region" => region.name())
                .increment(1);
        }
        hit
    }

    fn put(&self, region: CacheRegion, key: &str, value: CachedValue) {
        self.entries.insert((region, key.to_string()), value);
    }

    fn evict(&self, region: CacheRegion, key: &str) {
        self.entries.remove(&(region, key.to_string()));
    }

    fn evict_region(&self, region: CacheRegion) {
        self.entries.retain(|(r, _), _| *r != region);
        tracing::debug!(region = region.name(), "Cache region evicted");
    }
}
