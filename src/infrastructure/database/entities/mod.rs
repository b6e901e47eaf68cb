//! Database entities module

pub mod knowledge;
pub mod skill;
pub mod user;
pub mod user_knowledge;
pub mod user_skill;

pub use knowledge::Entity as Knowledge;
pub use skill::Entity as Skill;
pub use user::Entity as User;
pub use user_knowledge::Entity as UserKnowledge;
pub use user_skill::Entity as UserSkill;
