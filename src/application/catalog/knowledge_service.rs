//! Knowledge catalog service

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::info;

use crate::application::cache::{keys, CacheRegion, CachedValue, SharedCache};
use crate::application::forms::{KnowledgeSettingsForm, KnowledgeWithSelection};
use crate::domain::{
    DomainError, DomainResult, Knowledge, KnowledgeRepositoryInterface, UserRepositoryInterface,
};

pub struct KnowledgeService {
    repo: Arc<dyn KnowledgeRepositoryInterface>,
    users: Arc<dyn UserRepositoryInterface>,
    cache: SharedCache,
}

impl KnowledgeService {
    pub fn new(
        repo: Arc<dyn KnowledgeRepositoryInterface>,
        users: Arc<dyn UserRepositoryInterface>,
        cache: SharedCache,
    ) -> Self {
        Self { repo, users, cache }
    }

    /// The whole catalog, each entry flagged when `username` has it.
    pub async fn find_all_knowledges_selected_for_user(
        &self,
        username: &str,
    ) -> DomainResult<Vec<KnowledgeWithSelection>> {
        let key = keys::knowledges_for(username);
        if let Some(CachedValue::Knowledges(items)) = self.cache.get(CacheRegion::Knowledge, &key)
        {
            return Ok(items);
        }

        let user = self
            .users
            .find_user_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("User", "username", username))?;

        let items: Vec<KnowledgeWithSelection> = self
            .repo
            .find_all()
            .await?
            .iter()
            .map(|k| KnowledgeWithSelection::new(k, user.has_knowledge(k.id)))
            .collect();

        self.cache
            .put(CacheRegion::Knowledge, &key, CachedValue::Knowledges(items.clone()));
        Ok(items)
    }

    pub async fn find_knowledge_by_id(&self, id: i32) -> DomainResult<Knowledge> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Knowledge", "id", id.to_string()))
    }

    /// Resolve the selected entries of a submitted form to catalog entities.
    ///
    /// Entries missing from the submission count as unselected. An id that
    /// is not in the catalog fails the whole submission.
    pub async fn resolve_selection(
        &self,
        form: &KnowledgeSettingsForm,
    ) -> DomainResult<BTreeSet<Knowledge>> {
        let mut selected = BTreeSet::new();
        for id in form.selected_ids() {
            let knowledge = self.repo.find_by_id(id).await?.ok_or_else(|| {
                DomainError::Validation(format!("Unknown knowledge id {}", id))
            })?;
            selected.insert(knowledge);
        }
        Ok(selected)
    }

    /// Insert `labels` when the catalog is empty. Returns the number inserted.
    pub async fn seed_catalog(&self, labels: &[String]) -> DomainResult<usize> {
        if !self.repo.find_all().await?.is_empty() {
            return Ok(0);
        }
        for label in labels {
            self.repo.create(label).await?;
        }
        if !labels.is_empty() {
            info!(count = labels.len(), "Knowledge catalog seeded");
        }
        Ok(labels.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::Fixture;

    #[tokio::test]
    async fn catalog_is_flagged_with_user_selection() {
        let fx = Fixture::new();
        let rust = fx.seed_knowledge("Rust").await;
        fx.seed_knowledge("Go").await;
        let mut alice = fx.seed_user("alice", "password1").await;
        alice.knowledges.insert(rust.clone());
        fx.user_service.save(alice).await.unwrap();

        let items = fx
            .knowledge_service
            .find_all_knowledges_selected_for_user("alice")
            .await
            .unwrap();

        let flags: Vec<(&str, bool)> = items
            .iter()
            .map(|k| (k.label.as_str(), k.selected))
            .collect();
        assert_eq!(flags, vec![("Go", false), ("Rust", true)]);
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let fx = Fixture::new();
        let err = fx
            .knowledge_service
            .find_all_knowledges_selected_for_user("nobody")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn resolve_selection_keeps_only_selected() {
        let fx = Fixture::new();
        let rust = fx.seed_knowledge("Rust").await;
        let go = fx.seed_knowledge("Go").await;

        let form = KnowledgeSettingsForm::new(vec![
            KnowledgeWithSelection::new(&rust, true),
            KnowledgeWithSelection::new(&go, false),
        ]);
        let resolved = fx.knowledge_service.resolve_selection(&form).await.unwrap();

        assert_eq!(resolved.into_iter().collect::<Vec<_>>(), vec![rust]);
    }

    #[tokio::test]
    async fn resolve_selection_rejects_unknown_ids() {
        let fx = Fixture::new();
        let form = KnowledgeSettingsForm::new(vec![KnowledgeWithSelection {
            knowledge_id: 42,
            label: String::new(),
            selected: true,
        }]);

        let err = fx
            .knowledge_service
            .resolve_selection(&form)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn seeding_skips_non_empty_catalog() {
        let fx = Fixture::new();
        let labels = vec!["Rust".to_string(), "SQL".to_string()];

        assert_eq!(fx.knowledge_service.seed_catalog(&labels).await.unwrap(), 2);
        assert_eq!(fx.knowledge_service.seed_catalog(&labels).await.unwrap(), 0);
        assert!(fx.knowledge_service.find_knowledge_by_id(1).await.is_ok());
    }
}
