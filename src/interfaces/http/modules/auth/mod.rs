//! Authentication module: login, register, current user

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::interfaces::http::middleware::{auth_middleware, AuthState};

pub fn auth_routes(state: AuthHandlerState, auth_state: AuthState) -> Router {
    let public = Router::new()
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/register", post(register));

    let protected = Router::new()
        .route("/api/v1/auth/me", get(get_current_user))
        .route_layer(middleware::from_fn_with_state(auth_state, auth_middleware));

    public.merge(protected).with_state(state)
}
