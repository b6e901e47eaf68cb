//! Settings forms: request payloads bound by the settings handlers
//!
//! Edit forms are pre-filled from a `User` on GET and validated with
//! `validator` on POST before anything reaches a service.

pub mod password;
pub mod profile;
pub mod selection;

pub use password::PasswordSettingsForm;
pub use profile::ProfileSettingsForm;
pub use selection::{
    KnowledgeSettingsForm, KnowledgeWithSelection, SkillSettingsForm, SkillWithSelection,
};
