pub mod cache;
pub mod catalog;
pub mod forms;
pub mod identity;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export key types for convenience
pub use cache::{create_cache, CacheProvider, CacheRegion, SharedCache};
pub use catalog::{KnowledgeService, SkillService};
pub use identity::{can_edit, IdentityUpdate, RepositoryAuthenticationManager, UserService};
