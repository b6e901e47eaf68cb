use std::collections::BTreeSet;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::db_err;
use crate::domain::{
    DomainError, DomainResult, Knowledge, Password, Skill, User, UserRepositoryInterface,
    UserRole,
};
use crate::infrastructure::database::entities::{
    knowledge, skill, user, user_knowledge, user_skill,
};

pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Attach the knowledge and skill sets to a user row.
    async fn hydrate(&self, model: user::Model) -> DomainResult<User> {
        let knowledges = model
            .find_related(knowledge::Entity)
            .order_by_asc(knowledge::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        let skills = model
            .find_related(skill::Entity)
            .order_by_asc(skill::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(User {
            id: model.id,
            username: model.username,
            email: model.email,
            name: model.name,
            password: Password::Hashed(model.password_hash),
            role: entity_role_to_domain(model.role),
            knowledges: knowledges
                .into_iter()
                .map(|k| Knowledge::new(k.id, k.label))
                .collect::<BTreeSet<_>>(),
            skills: skills
                .into_iter()
                .map(|s| Skill::new(s.id, s.label))
                .collect::<BTreeSet<_>>(),
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn entity_role_to_domain(role: user::UserRole) -> UserRole {
    match role {
        user::UserRole::Employee => UserRole::Employee,
        user::UserRole::Hr => UserRole::Hr,
    }
}

fn domain_role_to_entity(role: UserRole) -> user::UserRole {
    match role {
        UserRole::Employee => user::UserRole::Employee,
        UserRole::Hr => user::UserRole::Hr,
    }
}

fn unique_or_db_err(e: sea_orm::DbErr) -> DomainError {
    if e.to_string().contains("UNIQUE") || e.to_string().contains("duplicate") {
        DomainError::Conflict("Username or email already exists".to_string())
    } else {
        db_err(e)
    }
}

/// Replace the stored tag sets of `user` inside the caller's transaction.
async fn replace_tags<C: ConnectionTrait>(conn: &C, user: &User) -> Result<(), sea_orm::DbErr> {
    user_knowledge::Entity::delete_many()
        .filter(user_knowledge::Column::UserId.eq(user.id.as_str()))
        .exec(conn)
        .await?;
    if !user.knowledges.is_empty() {
        let rows = user.knowledges.iter().map(|k| user_knowledge::ActiveModel {
            user_id: Set(user.id.clone()),
            knowledge_id: Set(k.id),
        });
        user_knowledge::Entity::insert_many(rows).exec(conn).await?;
    }

    user_skill::Entity::delete_many()
        .filter(user_skill::Column::UserId.eq(user.id.as_str()))
        .exec(conn)
        .await?;
    if !user.skills.is_empty() {
        let rows = user.skills.iter().map(|s| user_skill::ActiveModel {
            user_id: Set(user.id.clone()),
            skill_id: Set(s.id),
        });
        user_skill::Entity::insert_many(rows).exec(conn).await?;
    }

    Ok(())
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepositoryInterface for UserRepository {
    async fn find_one(&self, id: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        match model {
            Some(model) => Ok(Some(self.hydrate(model).await?)),
            None => Ok(None),
        }
    }

    async fn find_user_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        match model {
            Some(model) => Ok(Some(self.hydrate(model).await?)),
            None => Ok(None),
        }
    }

    async fn find_all_users_with_knowledge(&self, label: &str) -> DomainResult<Vec<User>> {
        let Some(knowledge) = knowledge::Entity::find()
            .filter(knowledge::Column::Label.eq(label))
            .one(&self.db)
            .await
            .map_err(db_err)?
        else {
            return Ok(Vec::new());
        };

        let models = knowledge
            .find_related(user_knowledge::Entity)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        let user_ids: Vec<String> = models.into_iter().map(|m| m.user_id).collect();
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = user::Entity::find()
            .filter(user::Column::Id.is_in(user_ids))
            .order_by_asc(user::Column::Username)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let mut users = Vec::with_capacity(models.len());
        for model in models {
            users.push(self.hydrate(model).await?);
        }
        Ok(users)
    }

    async fn count(&self) -> DomainResult<u64> {
        user::Entity::find().count(&self.db).await.map_err(db_err)
    }

    async fn save(&self, user: User) -> DomainResult<User> {
        let Some(password_hash) = user.password.hash() else {
            return Err(DomainError::Validation(
                "Refusing to persist a raw password".into(),
            ));
        };

        let txn = self.db.begin().await.map_err(db_err)?;

        let exists = user::Entity::find_by_id(user.id.as_str())
            .one(&txn)
            .await
            .map_err(db_err)?
            .is_some();

        let active = user::ActiveModel {
            id: Set(user.id.clone()),
            username: Set(user.username.clone()),
            email: Set(user.email.clone()),
            name: Set(user.name.clone()),
            password_hash: Set(password_hash.to_string()),
            role: Set(domain_role_to_entity(user.role)),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        };

        if exists {
            active.update(&txn).await.map_err(unique_or_db_err)?;
        } else {
            active.insert(&txn).await.map_err(unique_or_db_err)?;
        }

        replace_tags(&txn, &user).await.map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;

        Ok(user)
    }
}
