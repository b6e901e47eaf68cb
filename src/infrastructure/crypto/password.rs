//! Password hashing utilities

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::domain::{DomainResult, PasswordEncoder};
use crate::shared::InfraError;

/// Hash a password using bcrypt
pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    hash(password, cost)
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password, hash)
}

/// bcrypt-backed `PasswordEncoder`
#[derive(Debug, Clone)]
pub struct BcryptPasswordEncoder {
    cost: u32,
}

impl BcryptPasswordEncoder {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}

impl PasswordEncoder for BcryptPasswordEncoder {
    fn encode(&self, raw: &str) -> DomainResult<String> {
        Ok(hash_password(raw, self.cost).map_err(InfraError::from)?)
    }

    fn matches(&self, raw: &str, encoded: &str) -> bool {
        // a malformed hash is treated as a mismatch
        verify_password(raw, encoded).unwrap_or(false)
    }
}
