use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::User;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct ProfileSettingsForm {
    pub id: String,
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,
    #[validate(length(
        min = 3,
        max = 50,
        message = "username must be between 3 and 50 characters"
    ))]
    pub username: String,
    #[validate(email(message = "invalid email format"))]
    pub email: String,
}

impl From<&User> for ProfileSettingsForm {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}
