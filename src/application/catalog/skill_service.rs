//! Skill catalog service

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::info;

use crate::application::cache::{keys, CacheRegion, CachedValue, SharedCache};
use crate::application::forms::{SkillSettingsForm, SkillWithSelection};
use crate::domain::{
    DomainError, DomainResult, Skill, SkillRepositoryInterface, UserRepositoryInterface,
};

pub struct SkillService {
    repo: Arc<dyn SkillRepositoryInterface>,
    users: Arc<dyn UserRepositoryInterface>,
    cache: SharedCache,
}

impl SkillService {
    pub fn new(
        repo: Arc<dyn SkillRepositoryInterface>,
        users: Arc<dyn UserRepositoryInterface>,
        cache: SharedCache,
    ) -> Self {
        Self { repo, users, cache }
    }

    pub async fn find_all_skills_selected_for_user(
        &self,
        username: &str,
    ) -> DomainResult<Vec<SkillWithSelection>> {
        let key = keys::skills_for(username);
        if let Some(CachedValue::Skills(items)) = self.cache.get(CacheRegion::Skill, &key) {
            return Ok(items);
        }

        let user = self
            .users
            .find_user_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("User", "username", username))?;

        let items: Vec<SkillWithSelection> = self
            .repo
            .find_all()
            .await?
            .iter()
            .map(|s| SkillWithSelection::new(s, user.has_skill(s.id)))
            .collect();

        self.cache
            .put(CacheRegion::Skill, &key, CachedValue::Skills(items.clone()));
        Ok(items)
    }

    pub async fn find_skill_by_id(&self, id: i32) -> DomainResult<Skill> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Skill", "id", id.to_string()))
    }

    pub async fn resolve_selection(&self, form: &SkillSettingsForm) -> DomainResult<BTreeSet<Skill>> {
        let mut selected = BTreeSet::new();
        for id in form.selected_ids() {
            let skill = self
                .repo
                .find_by_id(id)
                .await?
                .ok_or_else(|| DomainError::Validation(format!("Unknown skill id {}", id)))?;
            selected.insert(skill);
        }
        Ok(selected)
    }

    pub async fn seed_catalog(&self, labels: &[String]) -> DomainResult<usize> {
        if !self.repo.find_all().await?.is_empty() {
            return Ok(0);
        }
        for label in labels {
            self.repo.create(label).await?;
        }
        if !labels.is_empty() {
            info!(count = labels.len(), "Skill catalog seeded");
        }
        Ok(labels.len())
    }
}
