//! Authentication middleware for Axum

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{debug, error, warn};

use crate::application::UserService;
use crate::domain::{DomainError, Principal};
use crate::infrastructure::crypto::jwt::{verify_token, JwtConfig};

/// Header carrying a re-issued token after a self-service identity change
pub const SESSION_TOKEN_HEADER: &str = "x-session-token";

/// Authentication error types
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    ExpiredToken,
    StaleToken,
    InsufficientPermissions,
    Unavailable,
}

/// Authentication state: JWT config plus the user store the principal is
/// reloaded from
#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
    pub user_service: Arc<UserService>,
}

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

/// JWT authentication middleware. Inserts the `Principal` into request
/// extensions.
///
/// The principal is rebuilt from the stored account named by `sub`, so a
/// token minted before a rename no longer speaks for the old username.
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(String::from);
    let Some(auth_header) = auth_header else {
        return auth_error_response(AuthError::MissingToken);
    };

    let Some(token) = extract_token(&auth_header) else {
        return auth_error_response(AuthError::InvalidToken);
    };

    let claims = match verify_token(token, &auth_state.jwt_config) {
        Ok(claims) => claims,
        Err(_) => return auth_error_response(AuthError::InvalidToken),
    };
    if claims.is_expired() {
        return auth_error_response(AuthError::ExpiredToken);
    }

    let user = match auth_state.user_service.find_user_by_id(&claims.sub).await {
        Ok(user) => user,
        Err(DomainError::NotFound { .. }) => {
            warn!(user_id = %claims.sub, "Token for unknown account");
            return auth_error_response(AuthError::InvalidToken);
        }
        Err(e) => {
            error!(error = %e, "Failed to load token account");
            return auth_error_response(AuthError::Unavailable);
        }
    };
    if user.username != claims.username {
        warn!(
            user_id = %user.id,
            token_username = %claims.username,
            "Token issued before a rename"
        );
        return auth_error_response(AuthError::StaleToken);
    }

    let principal = Principal::from(&user);
    debug!(username = %principal.username, "Request authenticated");
    request.extensions_mut().insert(principal);
    next.run(request).await
}

/// Requires an elevated (HR) principal; must run after `auth_middleware`.
pub async fn hr_middleware(request: Request<Body>, next: Next) -> Response {
    let allowed = request
        .extensions()
        .get::<Principal>()
        .is_some_and(|p| p.role.is_elevated());

    if !allowed {
        return auth_error_response(AuthError::InsufficientPermissions);
    }

    next.run(request).await
}

pub fn auth_error_response(error: AuthError) -> Response {
    let (status, message) = match error {
        AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Missing authentication token"),
        AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid authentication token"),
        AuthError::ExpiredToken => (StatusCode::UNAUTHORIZED, "Token has expired"),
        AuthError::StaleToken => (StatusCode::UNAUTHORIZED, "Token no longer matches the account"),
        AuthError::InsufficientPermissions => (StatusCode::FORBIDDEN, "Insufficient permissions"),
        AuthError::Unavailable => (
            StatusCode::SERVICE_UNAVAILABLE,
            "Authentication temporarily unavailable",
        ),
    };

    let body = Json(json!({
        "success": false,
        "data": null,
        "error": message
    }));

    (status, body).into_response()
}
