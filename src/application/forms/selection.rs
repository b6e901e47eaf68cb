//! Catalog entries paired with a per-user "selected" flag

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Knowledge, Skill};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct KnowledgeWithSelection {
    pub knowledge_id: i32,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub selected: bool,
}

impl KnowledgeWithSelection {
    pub fn new(knowledge: &Knowledge, selected: bool) -> Self {
        Self {
            knowledge_id: knowledge.id,
            label: knowledge.label.clone(),
            selected,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SkillWithSelection {
    pub skill_id: i32,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub selected: bool,
}

impl SkillWithSelection {
    pub fn new(skill: &Skill, selected: bool) -> Self {
        Self {
            skill_id: skill.id,
            label: skill.label.clone(),
            selected,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct KnowledgeSettingsForm {
    #[serde(default)]
    pub knowledges: Vec<KnowledgeWithSelection>,
}

impl KnowledgeSettingsForm {
    pub fn new(knowledges: Vec<KnowledgeWithSelection>) -> Self {
        Self { knowledges }
    }

    /// Ids of the entries marked as selected, in submission order.
    pub fn selected_ids(&self) -> Vec<i32> {
        self.knowledges
            .iter()
            .filter(|k| k.selected)
            .map(|k| k.knowledge_id)
            .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SkillSettingsForm {
    #[serde(default)]
    pub skills: Vec<SkillWithSelection>,
}

impl SkillSettingsForm {
    pub fn new(skills: Vec<SkillWithSelection>) -> Self {
        Self { skills }
    }

    pub fn selected_ids(&self) -> Vec<i32> {
        self.skills
            .iter()
            .filter(|s| s.selected)
            .map(|s| s.skill_id)
            .collect()
    }
}
