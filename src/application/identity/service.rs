//! User service: application-layer orchestration
//!
//! All user mutations and cached user reads live here. HTTP handlers are
//! thin wrappers that delegate to this service and refresh their own
//! session token from the returned `IdentityUpdate`.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::application::cache::{keys, CacheRegion, CachedValue, SharedCache};
use crate::application::forms::{KnowledgeWithSelection, PasswordSettingsForm, ProfileSettingsForm};
use crate::domain::{
    AuthenticationManager, DomainError, DomainResult, Knowledge, Password, PasswordEncoder,
    Principal, Skill, User, UserRepositoryInterface,
};

/// Result of a self-service identity change.
///
/// The caller owns the session and is expected to re-issue its credential
/// from `principal` when the edited user is the acting user.
#[derive(Debug, Clone)]
pub struct IdentityUpdate {
    pub user: User,
    pub principal: Principal,
}

impl IdentityUpdate {
    fn from_saved(user: User) -> Self {
        Self {
            principal: Principal::from(&user),
            user,
        }
    }
}

pub struct UserService {
    repo: Arc<dyn UserRepositoryInterface>,
    password_encoder: Arc<dyn PasswordEncoder>,
    authentication_manager: Arc<dyn AuthenticationManager>,
    cache: SharedCache,
}

impl UserService {
    pub fn new(
        repo: Arc<dyn UserRepositoryInterface>,
        password_encoder: Arc<dyn PasswordEncoder>,
        authentication_manager: Arc<dyn AuthenticationManager>,
        cache: SharedCache,
    ) -> Self {
        Self {
            repo,
            password_encoder,
            authentication_manager,
            cache,
        }
    }

    // ── Authentication ──────────────────────────────────────────

    pub async fn authenticate(&self, username: &str, password: &str) -> DomainResult<Principal> {
        self.authentication_manager
            .authenticate(username, password)
            .await
    }

    // ── Commands (mutations) ────────────────────────────────────

    /// Hash a raw password if present, persist, and drop every cached
    /// user, knowledge and skill entry.
    pub async fn save(&self, mut user: User) -> DomainResult<User> {
        if let Password::Raw(raw) = &user.password {
            user.password = Password::Hashed(self.password_encoder.encode(raw)?);
        }
        user.updated_at = Utc::now();

        let saved = self.repo.save(user).await?;

        self.cache.evict_region(CacheRegion::User);
        self.cache.evict_region(CacheRegion::Knowledge);
        self.cache.evict_region(CacheRegion::Skill);

        debug!(user_id = %saved.id, "User saved");
        Ok(saved)
    }

    /// Persist a new user and authenticate it with the submitted password.
    pub async fn save_and_login(&self, user: User) -> DomainResult<(User, Principal)> {
        let Password::Raw(raw) = &user.password else {
            return Err(DomainError::Validation(
                "Registration requires a raw password".into(),
            ));
        };
        let raw = raw.clone();

        let saved = self.save(user).await?;
        let principal = self
            .authentication_manager
            .authenticate(&saved.username, &raw)
            .await?;

        info!(user_id = %saved.id, username = %saved.username, "New user registered");
        Ok((saved, principal))
    }

    pub async fn update_user_profile(
        &self,
        form: &ProfileSettingsForm,
    ) -> DomainResult<IdentityUpdate> {
        let mut user = self.load(&form.id).await?;
        let previous_username = std::mem::replace(&mut user.username, form.username.clone());
        user.name = form.name.clone();
        user.email = form.email.clone();
        user.updated_at = Utc::now();

        let saved = self.repo.save(user).await?;

        self.cache.evict_region(CacheRegion::User);
        if previous_username != saved.username {
            // selections are cached per username
            for username in [&previous_username, &saved.username] {
                self.cache
                    .evict(CacheRegion::Knowledge, &keys::knowledges_for(username));
                self.cache
                    .evict(CacheRegion::Skill, &keys::skills_for(username));
            }
        }

        info!(
            user_id = %saved.id,
            username = %saved.username,
            previous_username = %previous_username,
            "Profile updated"
        );
        Ok(IdentityUpdate::from_saved(saved))
    }

    pub async fn update_user_password(
        &self,
        form: &PasswordSettingsForm,
    ) -> DomainResult<IdentityUpdate> {
        let mut user = self.load(&form.id).await?;
        user.password = Password::Hashed(self.password_encoder.encode(&form.new_password)?);
        user.updated_at = Utc::now();

        let saved = self.repo.save(user).await?;

        self.cache.evict_region(CacheRegion::User);

        info!(user_id = %saved.id, "Password changed");
        Ok(IdentityUpdate::from_saved(saved))
    }

    /// Replace the knowledge set of `username`. The record is read from the
    /// store, not the cache, so concurrent profile or password changes
    /// survive.
    pub async fn update_user_knowledges(
        &self,
        username: &str,
        knowledges: BTreeSet<Knowledge>,
    ) -> DomainResult<User> {
        let mut user = self.load_by_username(username).await?;
        user.knowledges = knowledges;
        self.save(user).await
    }

    /// Replace the skill set of `username`, reading the record uncached.
    pub async fn update_user_skills(
        &self,
        username: &str,
        skills: BTreeSet<Skill>,
    ) -> DomainResult<User> {
        let mut user = self.load_by_username(username).await?;
        user.skills = skills;
        self.save(user).await
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn find_user_by_id(&self, id: &str) -> DomainResult<User> {
        let key = keys::user_by_id(id);
        if let Some(CachedValue::User(user)) = self.cache.get(CacheRegion::User, &key) {
            return Ok(user);
        }

        let user = self.load(id).await?;
        self.cache
            .put(CacheRegion::User, &key, CachedValue::User(user.clone()));
        Ok(user)
    }

    pub async fn find_user_by_username(&self, username: &str) -> DomainResult<User> {
        let key = keys::user_by_username(username);
        if let Some(CachedValue::User(user)) = self.cache.get(CacheRegion::User, &key) {
            return Ok(user);
        }

        let user = self.load_by_username(username).await?;
        self.cache
            .put(CacheRegion::User, &key, CachedValue::User(user.clone()));
        Ok(user)
    }

    /// Users having at least one of `labels`, each user listed once.
    pub async fn find_users_with_knowledges(&self, labels: &[String]) -> DomainResult<Vec<User>> {
        let mut result: BTreeMap<String, User> = BTreeMap::new();
        for label in labels {
            for user in self.repo.find_all_users_with_knowledge(label).await? {
                result.entry(user.id.clone()).or_insert(user);
            }
        }
        Ok(result.into_values().collect())
    }

    /// The user's current knowledges, all flagged as selected.
    pub async fn find_users_knowledges_with_selection(
        &self,
        username: &str,
    ) -> DomainResult<Vec<KnowledgeWithSelection>> {
        let key = keys::knowledges_for(username);
        if let Some(CachedValue::Knowledges(items)) = self.cache.get(CacheRegion::User, &key) {
            return Ok(items);
        }

        let user = self.load_by_username(username).await?;
        let items: Vec<KnowledgeWithSelection> = user
            .knowledges
            .iter()
            .map(|k| KnowledgeWithSelection::new(k, true))
            .collect();

        self.cache
            .put(CacheRegion::User, &key, CachedValue::Knowledges(items.clone()));
        Ok(items)
    }

    async fn load(&self, id: &str) -> DomainResult<User> {
        self.repo
            .find_one(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", "id", id))
    }

    async fn load_by_username(&self, username: &str) -> DomainResult<User> {
        self.repo
            .find_user_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("User", "username", username))
    }
}
