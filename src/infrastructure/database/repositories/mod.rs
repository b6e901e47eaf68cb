//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories.

pub mod knowledge_repository;
pub mod skill_repository;
pub mod user_repository;

pub use knowledge_repository::KnowledgeRepository;
pub use skill_repository::SkillRepository;
pub use user_repository::UserRepository;

use crate::domain::DomainError;
use crate::shared::InfraError;

pub(crate) fn db_err(e: sea_orm::DbErr) -> DomainError {
    InfraError::Database(e).into()
}
