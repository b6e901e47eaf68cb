//! Skill catalog entity

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "skills")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub label: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_skill::Entity")]
    UserSkills,
}

impl Related<super::user_skill::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserSkills.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
