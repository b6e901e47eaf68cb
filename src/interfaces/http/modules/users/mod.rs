//! Users module: HR directory lookups

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;

use axum::{middleware, routing::get, Router};

use crate::interfaces::http::middleware::{auth_middleware, hr_middleware, AuthState};

pub fn user_routes(state: UserHandlerState, auth_state: AuthState) -> Router {
    Router::new()
        .route("/api/v1/users", get(find_users))
        .route("/api/v1/users/{username}/knowledges", get(get_user_knowledges))
        .route_layer(middleware::from_fn(hr_middleware))
        .route_layer(middleware::from_fn_with_state(auth_state, auth_middleware))
        .with_state(state)
}
