use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, NotSet, QueryOrder, Set};

use super::db_err;
use crate::domain::{DomainError, DomainResult, Skill, SkillRepositoryInterface};
use crate::infrastructure::database::entities::skill;

pub struct SkillRepository {
    db: DatabaseConnection,
}

impl SkillRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_domain(model: skill::Model) -> Skill {
    Skill::new(model.id, model.label)
}

#[async_trait]
impl SkillRepositoryInterface for SkillRepository {
    async fn find_all(&self) -> DomainResult<Vec<Skill>> {
        let models = skill::Entity::find()
            .order_by_asc(skill::Column::Label)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(to_domain).collect())
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Skill>> {
        let model = skill::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(to_domain))
    }

    async fn create(&self, label: &str) -> DomainResult<Skill> {
        let active = skill::ActiveModel {
            id: NotSet,
            label: Set(label.to_string()),
        };
        let model = active.insert(&self.db).await.map_err(|e| {
            if e.to_string().contains("UNIQUE") {
                DomainError::Conflict(format!("Skill '{}' already exists", label))
            } else {
                db_err(e)
            }
        })?;
        Ok(to_domain(model))
    }
}
