use async_trait::async_trait;

use super::Skill;
use crate::domain::DomainResult;

#[async_trait]
pub trait SkillRepositoryInterface: Send + Sync {
    async fn find_all(&self) -> DomainResult<Vec<Skill>>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Skill>>;
    async fn create(&self, label: &str) -> DomainResult<Skill>;
}
