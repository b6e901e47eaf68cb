use async_trait::async_trait;

use super::User;
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepositoryInterface: Send + Sync {
    async fn find_one(&self, id: &str) -> DomainResult<Option<User>>;
    async fn find_user_by_username(&self, username: &str) -> DomainResult<Option<User>>;
    /// Users having a knowledge with the given label.
    async fn find_all_users_with_knowledge(&self, label: &str) -> DomainResult<Vec<User>>;
    async fn count(&self) -> DomainResult<u64>;

    /// Insert or update by id. The user's knowledge and skill sets replace
    /// the stored ones. Fails with `Validation` on a raw password and with
    /// `Conflict` on a duplicate username or email.
    async fn save(&self, user: User) -> DomainResult<User>;
}
