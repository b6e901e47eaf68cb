use async_trait::async_trait;

use super::Knowledge;
use crate::domain::DomainResult;

#[async_trait]
pub trait KnowledgeRepositoryInterface: Send + Sync {
    async fn find_all(&self) -> DomainResult<Vec<Knowledge>>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Knowledge>>;
    async fn find_by_label(&self, label: &str) -> DomainResult<Option<Knowledge>>;
    /// Insert a catalog entry. Used only when seeding an empty catalog.
    async fn create(&self, label: &str) -> DomainResult<Knowledge>;
}
