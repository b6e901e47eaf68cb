//! In-memory repository implementations

mod memory;

pub use memory::{InMemoryKnowledgeRepository, InMemorySkillRepository, InMemoryUserRepository};
