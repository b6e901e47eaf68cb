//! Authentication API handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};
use tracing::info;

use super::dto::{LoginRequest, LoginResponse, RegisterRequest, UserInfo};
use crate::application::UserService;
use crate::domain::{DomainError, Principal, User};
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::interfaces::http::common::{ApiError, ApiResponse, ApiResult, ValidatedJson};

/// Auth state
#[derive(Clone)]
pub struct AuthHandlerState {
    pub user_service: Arc<UserService>,
    pub jwt_config: JwtConfig,
}

fn issue(state: &AuthHandlerState, principal: &Principal, user: &User) -> ApiResult<LoginResponse> {
    let token = create_token(principal, &state.jwt_config)
        .map_err(|e| ApiError(DomainError::Storage(e.to_string())))?;

    Ok(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt_config.expiration_hours * 3600,
        user: UserInfo::from(user),
    })
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<ApiResponse<LoginResponse>>> {
    let principal = state
        .user_service
        .authenticate(&request.username, &request.password)
        .await?;
    let user = state.user_service.find_user_by_id(&principal.user_id).await?;

    info!(username = %principal.username, "User logged in");
    Ok(Json(ApiResponse::success(issue(&state, &principal, &user)?)))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created and logged in", body = ApiResponse<LoginResponse>),
        (status = 409, description = "User already exists"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn register(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<LoginResponse>>)> {
    let user = User::new(
        request.username,
        request.email,
        request.name,
        request.password,
    );
    let (user, principal) = state.user_service.save_and_login(user).await?;

    let response = issue(&state, &principal, &user)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserInfo>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_current_user(
    State(state): State<AuthHandlerState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<ApiResponse<UserInfo>>> {
    let user = state.user_service.find_user_by_id(&principal.user_id).await?;
    Ok(Json(ApiResponse::success(UserInfo::from(&user))))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request};
    use axum::response::Response;
    use axum::Router;
    use serde_json::{json, Value};

    use super::*;
    use crate::application::test_support::Fixture;
    use crate::infrastructure::crypto::jwt::verify_token;
    use crate::interfaces::http::middleware::AuthState;
    use crate::interfaces::http::modules::auth::auth_routes;

    fn jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "auth-test".into(),
            expiration_hours: 2,
            issuer: "user-settings".into(),
        }
    }

    fn app(fx: &Fixture) -> Router {
        auth_routes(
            AuthHandlerState {
                user_service: fx.user_service.clone(),
                jwt_config: jwt_config(),
            },
            AuthState {
                jwt_config: jwt_config(),
                user_service: fx.user_service.clone(),
            },
        )
    }

    async fn send(fx: &Fixture, req: Request<Body>) -> Response {
        use tower::Service;
        app(fx).into_service().call(req).await.unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    }

    async fn json_body(resp: Response) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn login_issues_token_for_valid_credentials() {
        let fx = Fixture::new();
        fx.seed_user("alice", "password1").await;

        let req = post_json(
            "/api/v1/auth/login",
            json!({"username": "alice", "password": "password1"}),
        );
        let resp = send(&fx, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = json_body(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["expires_in"], 7200);
        assert_eq!(body["data"]["user"]["role"], "employee");

        let claims = verify_token(body["data"]["token"].as_str().unwrap(), &jwt_config()).unwrap();
        assert_eq!(claims.username, "alice");
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() {
        let fx = Fixture::new();
        fx.seed_user("alice", "password1").await;

        let req = post_json(
            "/api/v1/auth/login",
            json!({"username": "alice", "password": "nope"}),
        );
        let resp = send(&fx, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(resp).await["success"], false);
    }

    #[tokio::test]
    async fn register_creates_and_logs_in() {
        let fx = Fixture::new();

        let req = post_json(
            "/api/v1/auth/register",
            json!({
                "username": "carol",
                "email": "carol@example.com",
                "name": "Carol",
                "password": "password1",
            }),
        );
        let resp = send(&fx, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body = json_body(resp).await;
        let token = body["data"]["token"].as_str().unwrap().to_string();

        let stored = fx.user_service.find_user_by_username("carol").await.unwrap();
        assert!(stored.password.is_hashed());

        let req = Request::builder()
            .uri("/api/v1/auth/me")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let resp = send(&fx, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json_body(resp).await["data"]["username"], "carol");
    }

    #[tokio::test]
    async fn register_rejects_duplicate_username() {
        let fx = Fixture::new();
        fx.seed_user("alice", "password1").await;

        let req = post_json(
            "/api/v1/auth/register",
            json!({
                "username": "alice",
                "email": "other@example.com",
                "name": "Other",
                "password": "password1",
            }),
        );
        assert_eq!(send(&fx, req).await.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn register_validates_payload() {
        let fx = Fixture::new();

        let req = post_json(
            "/api/v1/auth/register",
            json!({
                "username": "x",
                "email": "bad",
                "name": "X",
                "password": "short",
            }),
        );
        assert_eq!(
            send(&fx, req).await.status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[tokio::test]
    async fn me_requires_token() {
        let fx = Fixture::new();
        let req = Request::builder()
            .uri("/api/v1/auth/me")
            .body(Body::empty())
            .unwrap();
        assert_eq!(send(&fx, req).await.status(), StatusCode::UNAUTHORIZED);
    }
}
