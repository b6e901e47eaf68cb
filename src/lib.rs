//! # User Settings Service
//!
//! Self-service profile, password, knowledge and skill settings, with HR
//! users allowed to act on behalf of anyone.
//!
//! ## Architecture
//!
//! - **domain**: users, knowledge and skill catalogs, repository and security ports
//! - **application**: `UserService`, catalog services, cache, settings forms
//! - **infrastructure**: SeaORM and in-memory repositories, bcrypt, JWT
//! - **interfaces**: axum REST API with Swagger documentation
//! - **config**: TOML application configuration

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, run_migrations, DatabaseConfig};

// Re-export API router
pub use interfaces::http::{create_api_router, ApiContext};
