//! Cache abstraction for read-through lookups
//!
//! Values live in named regions. Mutations evict either a single key or a
//! whole region; services decide which. Providers are injected so tests can
//! run against the in-memory cache or with caching disabled.

pub mod memory;
pub mod noop;

use std::sync::Arc;

use crate::application::forms::{KnowledgeWithSelection, SkillWithSelection};
use crate::domain::User;

pub use memory::InMemoryCache;
pub use noop::NoopCache;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheRegion {
    User,
    Knowledge,
    Skill,
}

impl CacheRegion {
    pub fn name(&self) -> &'static str {
        match self {
            CacheRegion::User => "user",
            CacheRegion::Knowledge => "knowledge",
            CacheRegion::Skill => "skill",
        }
    }
}

#[derive(Debug, Clone)]
pub enum CachedValue {
    User(User),
    Knowledges(Vec<KnowledgeWithSelection>),
    Skills(Vec<SkillWithSelection>),
}

pub trait CacheProvider: Send + Sync {
    fn get(&self, region: CacheRegion, key: &str) -> Option<CachedValue>;
    fn put(&self, region: CacheRegion, key: &str, value: CachedValue);
    fn evict(&self, region: CacheRegion, key: &str);
    fn evict_region(&self, region: CacheRegion);
}

pub type SharedCache = Arc<dyn CacheProvider>;

/// Build the configured cache provider.
pub fn create_cache(enabled: bool) -> SharedCache {
    if enabled {
        Arc::new(InMemoryCache::new())
    } else {
        Arc::new(NoopCache)
    }
}

/// Cache key builders, one per cached operation.
pub mod keys {
    pub fn user_by_id(id: &str) -> String {
        format!("id:{id}")
    }

    pub fn user_by_username(username: &str) -> String {
        format!("username:{username}")
    }

    pub fn knowledges_for(username: &str) -> String {
        format!("knowledges-for:{username}")
    }

    pub fn skills_for(username: &str) -> String {
        format!("skills-for:{username}")
    }
}
