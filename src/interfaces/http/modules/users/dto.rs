//! HR directory DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::application::forms::KnowledgeWithSelection;
use crate::domain::User;

/// Directory entry
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: String,
    pub username: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub knowledges: Vec<String>,
    pub skills: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            role: u.role.as_str().to_string(),
            knowledges: u.knowledges.into_iter().map(|k| k.label).collect(),
            skills: u.skills.into_iter().map(|s| s.label).collect(),
            id: u.id,
            username: u.username,
            email: u.email,
            name: u.name,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FindUsersParams {
    /// Comma-separated knowledge labels; a user matches if it has any of them
    #[serde(default)]
    pub knowledges: String,
}

impl FindUsersParams {
    pub fn labels(&self) -> Vec<String> {
        self.knowledges
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }
}

/// A user's knowledges, all selected
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserKnowledgesDto {
    pub username: String,
    pub knowledges: Vec<KnowledgeWithSelection>,
}
