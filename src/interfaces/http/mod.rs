//! HTTP REST API interfaces
//!
//! - `common`: response envelope, error mapping, validated JSON
//! - `middleware`: JWT authentication and HR gate
//! - `modules`: per-resource handlers and routes
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::{create_api_router, ApiContext};
