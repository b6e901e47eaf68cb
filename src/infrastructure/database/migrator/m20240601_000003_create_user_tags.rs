//! Create user_knowledges and user_skills join tables

use sea_orm_migration::prelude::*;

use super::m20240601_000001_create_users::Users;
use super::m20240601_000002_create_catalogs::{Knowledges, Skills};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserKnowledges::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserKnowledges::UserId).string().not_null())
                    .col(
                        ColumnDef::new(UserKnowledges::KnowledgeId)
                            .integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(UserKnowledges::UserId)
                            .col(UserKnowledges::KnowledgeId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_knowledges_user")
                            .from(UserKnowledges::Table, UserKnowledges::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_knowledges_knowledge")
                            .from(UserKnowledges::Table, UserKnowledges::KnowledgeId)
                            .to(Knowledges::Table, Knowledges::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserSkills::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserSkills::UserId).string().not_null())
                    .col(ColumnDef::new(UserSkills::SkillId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(UserSkills::UserId)
                            .col(UserSkills::SkillId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_skills_user")
                            .from(UserSkills::Table, UserSkills::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_skills_skill")
                            .from(UserSkills::Table, UserSkills::SkillId)
                            .to(Skills::Table, Skills::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // lookups of users by knowledge
        manager
            .create_index(
                Index::create()
                    .name("idx_user_knowledges_knowledge_id")
                    .table(UserKnowledges::Table)
                    .col(UserKnowledges::KnowledgeId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserSkills::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserKnowledges::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum UserKnowledges {
    Table,
    UserId,
    KnowledgeId,
}

#[derive(Iden)]
pub enum UserSkills {
    Table,
    UserId,
    SkillId,
}
