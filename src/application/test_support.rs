//! Shared fixtures for service and handler tests

use std::sync::Arc;

use crate::application::cache::InMemoryCache;
use crate::application::catalog::{KnowledgeService, SkillService};
use crate::application::identity::{RepositoryAuthenticationManager, UserService};
use crate::domain::{
    Knowledge, KnowledgeRepositoryInterface, Skill, SkillRepositoryInterface, User, UserRole,
};
use crate::infrastructure::crypto::password::BcryptPasswordEncoder;
use crate::infrastructure::storage::{
    InMemoryKnowledgeRepository, InMemorySkillRepository, InMemoryUserRepository,
};

pub(crate) struct Fixture {
    pub users: Arc<InMemoryUserRepository>,
    pub knowledges: Arc<InMemoryKnowledgeRepository>,
    pub skills: Arc<InMemorySkillRepository>,
    pub password_encoder: Arc<BcryptPasswordEncoder>,
    pub authentication_manager: Arc<RepositoryAuthenticationManager>,
    pub user_service: Arc<UserService>,
    pub knowledge_service: Arc<KnowledgeService>,
    pub skill_service: Arc<SkillService>,
}

impl Fixture {
    pub fn new() -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let knowledges = Arc::new(InMemoryKnowledgeRepository::new());
        let skills = Arc::new(InMemorySkillRepository::new());
        // lowest bcrypt cost keeps the tests fast
        let password_encoder = Arc::new(BcryptPasswordEncoder::new(4));
        let cache = Arc::new(InMemoryCache::new());

        let authentication_manager = Arc::new(RepositoryAuthenticationManager::new(
            users.clone(),
            password_encoder.clone(),
        ));
        let user_service = Arc::new(UserService::new(
            users.clone(),
            password_encoder.clone(),
            authentication_manager.clone(),
            cache.clone(),
        ));
        let knowledge_service = Arc::new(KnowledgeService::new(
            knowledges.clone(),
            users.clone(),
            cache.clone(),
        ));
        let skill_service = Arc::new(SkillService::new(skills.clone(), users.clone(), cache));

        Self {
            users,
            knowledges,
            skills,
            password_encoder,
            authentication_manager,
            user_service,
            knowledge_service,
            skill_service,
        }
    }

    pub async fn seed_user(&self, username: &str, password: &str) -> User {
        self.seed_with_role(username, password, UserRole::Employee)
            .await
    }

    pub async fn seed_hr(&self, username: &str, password: &str) -> User {
        self.seed_with_role(username, password, UserRole::Hr).await
    }

    async fn seed_with_role(&self, username: &str, password: &str, role: UserRole) -> User {
        let user = User::new(
            username,
            format!("{username}@example.com"),
            username.to_uppercase(),
            password,
        )
        .with_role(role);
        self.user_service.save(user).await.unwrap()
    }

    pub async fn seed_knowledge(&self, label: &str) -> Knowledge {
        self.knowledges.create(label).await.unwrap()
    }

    pub async fn seed_skill(&self, label: &str) -> Skill {
        self.skills.create(label).await.unwrap()
    }
}
