//! HR directory handlers
//!
//! Read-only lookups across all users. Mounted behind `hr_middleware`.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::dto::{FindUsersParams, UserDto, UserKnowledgesDto};
use crate::application::UserService;
use crate::interfaces::http::common::{ApiResponse, ApiResult};

#[derive(Clone)]
pub struct UserHandlerState {
    pub user_service: Arc<UserService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(FindUsersParams),
    responses(
        (status = 200, description = "Users having any of the knowledges", body = ApiResponse<Vec<UserDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "HR role required")
    )
)]
pub async fn find_users(
    State(state): State<UserHandlerState>,
    Query(params): Query<FindUsersParams>,
) -> ApiResult<Json<ApiResponse<Vec<UserDto>>>> {
    let users = state
        .user_service
        .find_users_with_knowledges(&params.labels())
        .await?;
    let items = users.into_iter().map(UserDto::from).collect();
    Ok(Json(ApiResponse::success(items)))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{username}/knowledges",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "The user's knowledges", body = ApiResponse<UserKnowledgesDto>),
        (status = 403, description = "HR role required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_knowledges(
    State(state): State<UserHandlerState>,
    Path(username): Path<String>,
) -> ApiResult<Json<ApiResponse<UserKnowledgesDto>>> {
    let knowledges = state
        .user_service
        .find_users_knowledges_with_selection(&username)
        .await?;
    Ok(Json(ApiResponse::success(UserKnowledgesDto {
        username,
        knowledges,
    })))
}
