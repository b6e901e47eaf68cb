use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};

use super::db_err;
use crate::domain::{DomainError, DomainResult, Knowledge, KnowledgeRepositoryInterface};
use crate::infrastructure::database::entities::knowledge;

pub struct KnowledgeRepository {
    db: DatabaseConnection,
}

impl KnowledgeRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_domain(model: knowledge::Model) -> Knowledge {
    Knowledge::new(model.id, model.label)
}

#[async_trait]
impl KnowledgeRepositoryInterface for KnowledgeRepository {
    async fn find_all(&self) -> DomainResult<Vec<Knowledge>> {
        let models = knowledge::Entity::find()
            .order_by_asc(knowledge::Column::Label)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(to_domain).collect())
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Knowledge>> {
        let model = knowledge::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(to_domain))
    }

    async fn find_by_label(&self, label: &str) -> DomainResult<Option<Knowledge>> {
        let model = knowledge::Entity::find()
            .filter(knowledge::Column::Label.eq(label))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(to_domain))
    }

    async fn create(&self, label: &str) -> DomainResult<Knowledge> {
        let active = knowledge::ActiveModel {
            id: NotSet,
            label: Set(label.to_string()),
        };
        let model = active.insert(&self.db).await.map_err(|e| {
            if e.to_string().contains("UNIQUE") {
                DomainError::Conflict(format!("Knowledge '{}' already exists", label))
            } else {
                db_err(e)
            }
        })?;
        Ok(to_domain(model))
    }
}
