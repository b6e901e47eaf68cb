//! Knowledge catalog entity

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "knowledges")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub label: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_knowledge::Entity")]
    UserKnowledges,
}

impl Related<super::user_knowledge::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserKnowledges.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
