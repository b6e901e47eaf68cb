//! Tag catalogs (knowledges, skills) and per-user selection state

pub mod knowledge_service;
pub mod skill_service;

pub use knowledge_service::KnowledgeService;
pub use skill_service::SkillService;
