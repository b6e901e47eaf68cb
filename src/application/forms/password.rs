use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::User;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct PasswordSettingsForm {
    pub id: String,
    #[serde(default)]
    #[validate(length(
        min = 8,
        max = 128,
        message = "password must be between 8 and 128 characters"
    ))]
    pub new_password: String,
    #[serde(default)]
    #[validate(must_match(other = "new_password", message = "passwords do not match"))]
    pub confirm_password: String,
}

impl PasswordSettingsForm {
    /// Same form with the secrets blanked, for echoing back to the client.
    pub fn redacted(&self) -> Self {
        Self {
            id: self.id.clone(),
            ..Self::default()
        }
    }
}

impl From<&User> for PasswordSettingsForm {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            ..Self::default()
        }
    }
}
