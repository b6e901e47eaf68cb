//! User aggregate
//!
//! Contains the User entity and the repository interface.

pub mod model;
pub mod repository;

pub use model::{Password, User, UserRole};
pub use repository::UserRepositoryInterface;
