//! User entity for database

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// User role
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum UserRole {
    #[sea_orm(string_value = "employee")]
    Employee,
    #[sea_orm(string_value = "hr")]
    Hr,
}

/// User model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_knowledge::Entity")]
    UserKnowledges,
    #[sea_orm(has_many = "super::user_skill::Entity")]
    UserSkills,
}

impl Related<super::user_knowledge::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserKnowledges.def()
    }
}

impl Related<super::user_skill::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserSkills.def()
    }
}

impl Related<super::knowledge::Entity> for Entity {
    fn to() -> RelationDef {
        super::user_knowledge::Relation::Knowledge.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::user_knowledge::Relation::User.def().rev())
    }
}

impl Related<super::skill::Entity> for Entity {
    fn to() -> RelationDef {
        super::user_skill::Relation::Skill.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::user_skill::Relation::User.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
