//! Credential verification against the user repository

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::{
    AuthenticationManager, DomainError, DomainResult, PasswordEncoder, Principal,
    UserRepositoryInterface,
};

pub struct RepositoryAuthenticationManager {
    repo: Arc<dyn UserRepositoryInterface>,
    password_encoder: Arc<dyn PasswordEncoder>,
}

impl RepositoryAuthenticationManager {
    pub fn new(
        repo: Arc<dyn UserRepositoryInterface>,
        password_encoder: Arc<dyn PasswordEncoder>,
    ) -> Self {
        Self {
            repo,
            password_encoder,
        }
    }
}

#[async_trait]
impl AuthenticationManager for RepositoryAuthenticationManager {
    async fn authenticate(&self, username: &str, raw_password: &str) -> DomainResult<Principal> {
        let Some(user) = self.repo.find_user_by_username(username).await? else {
            debug!(username, "Authentication failed: unknown user");
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        };

        let valid = user
            .password
            .hash()
            .is_some_and(|hash| self.password_encoder.matches(raw_password, hash));
        if !valid {
            debug!(username, "Authentication failed: bad password");
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        }

        Ok(Principal::from(&user))
    }
}
