//! Settings page DTOs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::application::forms::{
    KnowledgeSettingsForm, PasswordSettingsForm, ProfileSettingsForm, SkillSettingsForm,
};
pub use crate::interfaces::http::common::FieldErrors;

/// Query parameters shared by every settings page
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SettingsParams {
    /// Username whose settings are shown or changed
    #[serde(rename = "editableUser")]
    pub editable_user: String,
    /// Set after a successful update
    #[serde(rename = "userUpdated", default)]
    pub user_updated: bool,
}

/// View model of one settings page
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPage<F> {
    pub active_page: String,
    pub editable_user: String,
    pub user_updated: bool,
    pub form: F,
    pub errors: FieldErrors,
}

pub type ProfilePage = SettingsPage<ProfileSettingsForm>;
pub type PasswordPage = SettingsPage<PasswordSettingsForm>;
pub type KnowledgesPage = SettingsPage<KnowledgeSettingsForm>;
pub type SkillsPage = SettingsPage<SkillSettingsForm>;

impl<F> SettingsPage<F> {
    pub fn new(active_page: &str, params: &SettingsParams, form: F) -> Self {
        Self {
            active_page: active_page.to_string(),
            editable_user: params.editable_user.clone(),
            user_updated: params.user_updated,
            form,
            errors: FieldErrors::new(),
        }
    }

    pub fn with_errors(mut self, errors: FieldErrors) -> Self {
        self.errors = errors;
        self
    }
}

/// `/settings/<page>?editableUser=<user>&userUpdated=true`
pub fn updated_location(page: &str, editable_user: &str) -> String {
    format!(
        "/settings/{}?editableUser={}&userUpdated=true",
        page,
        urlencoding::encode(editable_user)
    )
}
