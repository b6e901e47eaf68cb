//! Security ports: password hashing and credential verification

use async_trait::async_trait;

use crate::domain::{DomainResult, User, UserRole};

/// Identity of an authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: String,
    pub username: String,
    pub role: UserRole,
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            username: user.username.clone(),
            role: user.role,
        }
    }
}

pub trait PasswordEncoder: Send + Sync {
    fn encode(&self, raw: &str) -> DomainResult<String>;
    fn matches(&self, raw: &str, encoded: &str) -> bool;
}

#[async_trait]
pub trait AuthenticationManager: Send + Sync {
    /// Verify `raw_password` against the stored credential of `username`.
    ///
    /// Fails with `Unauthorized` on an unknown user or a wrong password.
    async fn authenticate(&self, username: &str, raw_password: &str) -> DomainResult<Principal>;
}
