//! Settings module: profile, password, knowledge and skill pages

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;

use axum::{middleware, routing::get, Router};

use crate::interfaces::http::middleware::{auth_middleware, AuthState};

/// `/settings/*` routes behind JWT authentication
pub fn settings_routes(state: SettingsState, auth_state: AuthState) -> Router {
    Router::new()
        .route("/settings", get(get_profile))
        .route("/settings/", get(get_profile))
        .route("/settings/profile", get(get_profile).post(update_profile))
        .route("/settings/password", get(get_password).post(update_password))
        .route(
            "/settings/knowledges",
            get(get_knowledges).post(update_knowledges),
        )
        .route("/settings/skills", get(get_skills).post(update_skills))
        .route_layer(middleware::from_fn_with_state(auth_state, auth_middleware))
        .with_state(state)
}
