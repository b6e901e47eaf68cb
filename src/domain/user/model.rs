use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};

use crate::domain::knowledge::Knowledge;
use crate::domain::skill::Skill;

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserRole {
    #[default]
    Employee,
    /// HR staff may edit the settings of any user
    Hr,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Employee => "employee",
            UserRole::Hr => "hr",
        }
    }

    pub fn is_elevated(&self) -> bool {
        matches!(self, UserRole::Hr)
    }
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "hr" => UserRole::Hr,
            _ => UserRole::Employee,
        }
    }
}

/// User credential.
///
/// `Raw` only exists between form binding and the service that hashes it;
/// repositories reject it.
#[derive(Clone, PartialEq, Eq)]
pub enum Password {
    Raw(String),
    Hashed(String),
}

impl Password {
    pub fn hash(&self) -> Option<&str> {
        match self {
            Password::Hashed(h) => Some(h),
            Password::Raw(_) => None,
        }
    }

    pub fn is_hashed(&self) -> bool {
        matches!(self, Password::Hashed(_))
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Password::Raw(_) => f.write_str("Password::Raw(***)"),
            Password::Hashed(_) => f.write_str("Password::Hashed(***)"),
        }
    }
}

/// User model
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub name: String,
    pub password: Password,
    pub role: UserRole,
    pub knowledges: BTreeSet<Knowledge>,
    pub skills: BTreeSet<Skill>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// A not yet persisted user carrying a raw password.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        name: impl Into<String>,
        raw_password: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.into(),
            email: email.into(),
            name: name.into(),
            password: Password::Raw(raw_password.into()),
            role: UserRole::default(),
            knowledges: BTreeSet::new(),
            skills: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_role(mut self, role: UserRole) -> Self {
        self.role = role;
        self
    }

    pub fn has_knowledge(&self, knowledge_id: i32) -> bool {
        self.knowledges.iter().any(|k| k.id == knowledge_id)
    }

    pub fn has_skill(&self, skill_id: i32) -> bool {
        self.skills.iter().any(|s| s.id == skill_id)
    }
}
