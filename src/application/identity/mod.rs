//! Identity module: user management & authentication
//!
//! Contains the `UserService`, the repository-backed authentication
//! manager and the settings access rule.

pub mod access;
pub mod authentication;
pub mod service;

pub use access::can_edit;
pub use authentication::RepositoryAuthenticationManager;
pub use service::{IdentityUpdate, UserService};
