//! In-memory repositories for development and testing

use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::{
    DomainError, DomainResult, Knowledge, KnowledgeRepositoryInterface, Skill,
    SkillRepositoryInterface, User, UserRepositoryInterface,
};

/// In-memory user storage keyed by user id
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: DashMap<String, User>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepositoryInterface for InMemoryUserRepository {
    async fn find_one(&self, id: &str) -> DomainResult<Option<User>> {
        Ok(self.users.get(id).map(|u| u.value().clone()))
    }

    async fn find_user_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.username == username)
            .map(|u| u.value().clone()))
    }

    async fn find_all_users_with_knowledge(&self, label: &str) -> DomainResult<Vec<User>> {
        Ok(self
            .users
            .iter()
            .filter(|u| u.knowledges.iter().any(|k| k.label == label))
            .map(|u| u.value().clone())
            .collect())
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.users.len() as u64)
    }

    async fn save(&self, user: User) -> DomainResult<User> {
        if !user.password.is_hashed() {
            return Err(DomainError::Validation(
                "Refusing to persist a raw password".into(),
            ));
        }

        let taken = self.users.iter().any(|other| {
            other.id != user.id && (other.username == user.username || other.email == user.email)
        });
        if taken {
            return Err(DomainError::Conflict(
                "Username or email already exists".to_string(),
            ));
        }

        self.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }
}

/// In-memory knowledge catalog
pub struct InMemoryKnowledgeRepository {
    knowledges: DashMap<i32, Knowledge>,
    counter: AtomicI32,
}

impl InMemoryKnowledgeRepository {
    pub fn new() -> Self {
        Self {
            knowledges: DashMap::new(),
            counter: AtomicI32::new(1),
        }
    }
}

impl Default for InMemoryKnowledgeRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KnowledgeRepositoryInterface for InMemoryKnowledgeRepository {
    async fn find_all(&self) -> DomainResult<Vec<Knowledge>> {
        let mut all: Vec<Knowledge> = self.knowledges.iter().map(|k| k.value().clone()).collect();
        all.sort_by(|a, b| a.label.cmp(&b.label));
        Ok(all)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Knowledge>> {
        Ok(self.knowledges.get(&id).map(|k| k.value().clone()))
    }

    async fn find_by_label(&self, label: &str) -> DomainResult<Option<Knowledge>> {
        Ok(self
            .knowledges
            .iter()
            .find(|k| k.label == label)
            .map(|k| k.value().clone()))
    }

    async fn create(&self, label: &str) -> DomainResult<Knowledge> {
        if self.find_by_label(label).await?.is_some() {
            return Err(DomainError::Conflict(format!(
                "Knowledge '{}' already exists",
                label
            )));
        }
        let id = self.counter.fetch_add(1, Ordering::SeqCst);
        let knowledge = Knowledge::new(id, label);
        self.knowledges.insert(id, knowledge.clone());
        Ok(knowledge)
    }
}

/// In-memory skill catalog
pub struct InMemorySkillRepository {
    skills: DashMap<i32, Skill>,
    counter: AtomicI32,
}

impl InMemorySkillRepository {
    pub fn new() -> Self {
        Self {
            skills: DashMap::new(),
            counter: AtomicI32::new(1),
        }
    }
}

impl Default for InMemorySkillRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SkillRepositoryInterface for InMemorySkillRepository {
    async fn find_all(&self) -> DomainResult<Vec<Skill>> {
        let mut all: Vec<Skill> = self.skills.iter().map(|s| s.value().clone()).collect();
        all.sort_by(|a, b| a.label.cmp(&b.label));
        Ok(all)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Skill>> {
        Ok(self.skills.get(&id).map(|s| s.value().clone()))
    }

    async fn create(&self, label: &str) -> DomainResult<Skill> {
        if self.skills.iter().any(|s| s.label == label) {
            return Err(DomainError::Conflict(format!(
                "Skill '{}' already exists",
                label
            )));
        }
        let id = self.counter.fetch_add(1, Ordering::SeqCst);
        let skill = Skill::new(id, label);
        self.skills.insert(id, skill.clone());
        Ok(skill)
    }
}
