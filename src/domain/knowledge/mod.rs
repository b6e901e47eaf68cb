//! Knowledge aggregate
//!
//! Catalog of knowledge tags. The catalog itself is read-only here;
//! users reference entries through a many-to-many relation.

pub mod model;
pub mod repository;

pub use model::Knowledge;
pub use repository::KnowledgeRepositoryInterface;
