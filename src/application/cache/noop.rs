//! Cache provider that stores nothing

use super::{CacheProvider, CacheRegion, CachedValue};

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCache;

impl CacheProvider for NoopCache {
    fn get(&self, _region: CacheRegion, _key: &str) -> Option<CachedValue> {
        None
    }

    fn put(&self, _region: CacheRegion, _key: &str, _value: CachedValue) {}

    fn evict(&self, _region: CacheRegion, _key: &str) {}

    fn evict_region(&self, _region: CacheRegion) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_returns_a_value() {
        let cache = NoopCache;
        cache.put(CacheRegion::Knowledge, "k", CachedValue::Knowledges(vec![]));
        assert!(cache.get(CacheRegion::Knowledge, "k").is_none());
    }
}
