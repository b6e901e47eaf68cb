pub mod knowledge;
pub mod ports;
pub mod skill;
pub mod user;

// Re-export commonly used types
pub use knowledge::{Knowledge, KnowledgeRepositoryInterface};
pub use ports::{AuthenticationManager, PasswordEncoder, Principal};
pub use skill::{Skill, SkillRepositoryInterface};
pub use user::{Password, User, UserRepositoryInterface, UserRole};

// Re-export DomainError from shared for convenience
pub use crate::shared::errors::{DomainError, DomainResult};
