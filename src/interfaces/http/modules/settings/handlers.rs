//! Settings page handlers
//!
//! Every handler first checks that the caller may edit `editableUser`,
//! then looks at the validated form before any service call. Updates
//! answer `303 See Other` back to the GET page.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Extension, Json,
};
use tracing::{info, warn};

use super::dto::{updated_location, FieldErrors, SettingsPage, SettingsParams};
use crate::application::forms::{
    KnowledgeSettingsForm, PasswordSettingsForm, ProfileSettingsForm, SkillSettingsForm,
};
use crate::application::{can_edit, IdentityUpdate, KnowledgeService, SkillService, UserService};
use crate::domain::{DomainError, Principal, User};
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::interfaces::http::common::{ApiError, ApiResult, CheckedJson};
use crate::interfaces::http::middleware::SESSION_TOKEN_HEADER;

#[derive(Clone)]
pub struct SettingsState {
    pub user_service: Arc<UserService>,
    pub knowledge_service: Arc<KnowledgeService>,
    pub skill_service: Arc<SkillService>,
    pub jwt_config: JwtConfig,
}

const PROFILE_PAGE: &str = "profile";
const PASSWORD_PAGE: &str = "password";
const KNOWLEDGES_PAGE: &str = "knowledges";
const SKILLS_PAGE: &str = "skills";

fn ensure_can_edit(principal: &Principal, params: &SettingsParams) -> ApiResult<()> {
    if can_edit(principal, &params.editable_user) {
        return Ok(());
    }
    warn!(
        acting = %principal.username,
        target = %params.editable_user,
        "Settings access denied"
    );
    Err(ApiError(DomainError::Forbidden(format!(
        "Not allowed to edit settings of '{}'",
        params.editable_user
    ))))
}

/// The submitted form must belong to the `editableUser` record.
fn ensure_same_record(target: &User, form_id: &str) -> ApiResult<()> {
    if target.id == form_id {
        Ok(())
    } else {
        Err(ApiError(DomainError::Forbidden(
            "Form does not belong to the edited user".into(),
        )))
    }
}

fn invalid<F: serde::Serialize>(page: SettingsPage<F>, errors: FieldErrors) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(page.with_errors(errors)),
    )
        .into_response()
}

/// 303 to the updated page, carrying a fresh token when the caller
/// changed their own account.
fn updated_redirect(
    page: &str,
    principal: &Principal,
    update: &IdentityUpdate,
    jwt_config: &JwtConfig,
) -> ApiResult<Response> {
    let mut response =
        Redirect::to(&updated_location(page, &update.user.username)).into_response();

    if principal.user_id == update.user.id {
        let token = create_token(&update.principal, jwt_config)
            .map_err(|e| ApiError(DomainError::Storage(e.to_string())))?;
        if let Ok(value) = HeaderValue::from_str(&token) {
            response.headers_mut().insert(SESSION_TOKEN_HEADER, value);
        }
    }

    Ok(response)
}

// ── Profile ─────────────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/settings/profile",
    tag = "Settings",
    security(("bearer_auth" = [])),
    params(SettingsParams),
    responses(
        (status = 200, description = "Profile page", body = SettingsPage<ProfileSettingsForm>),
        (status = 403, description = "Not allowed to edit this user"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_profile(
    State(state): State<SettingsState>,
    Extension(principal): Extension<Principal>,
    Query(params): Query<SettingsParams>,
) -> ApiResult<Json<SettingsPage<ProfileSettingsForm>>> {
    ensure_can_edit(&principal, &params)?;
    let user = state
        .user_service
        .find_user_by_username(&params.editable_user)
        .await?;
    let form = ProfileSettingsForm::from(&user);
    Ok(Json(SettingsPage::new(PROFILE_PAGE, &params, form)))
}

#[utoipa::path(
    post,
    path = "/settings/profile",
    tag = "Settings",
    security(("bearer_auth" = [])),
    params(SettingsParams),
    request_body = ProfileSettingsForm,
    responses(
        (status = 303, description = "Profile updated"),
        (status = 403, description = "Not allowed to edit this user"),
        (status = 409, description = "Username or email already taken"),
        (status = 422, description = "Invalid form", body = SettingsPage<ProfileSettingsForm>)
    )
)]
pub async fn update_profile(
    State(state): State<SettingsState>,
    Extension(principal): Extension<Principal>,
    Query(params): Query<SettingsParams>,
    CheckedJson(form, errors): CheckedJson<ProfileSettingsForm>,
) -> ApiResult<Response> {
    ensure_can_edit(&principal, &params)?;
    if !errors.is_empty() {
        return Ok(invalid(SettingsPage::new(PROFILE_PAGE, &params, form), errors));
    }

    let target = state
        .user_service
        .find_user_by_username(&params.editable_user)
        .await?;
    ensure_same_record(&target, &form.id)?;

    let update = state.user_service.update_user_profile(&form).await?;
    info!(
        acting = %principal.username,
        user_id = %update.user.id,
        "Profile settings saved"
    );
    updated_redirect(PROFILE_PAGE, &principal, &update, &state.jwt_config)
}

// ── Password ────────────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/settings/password",
    tag = "Settings",
    security(("bearer_auth" = [])),
    params(SettingsParams),
    responses(
        (status = 200, description = "Password page", body = SettingsPage<PasswordSettingsForm>),
        (status = 403, description = "Not allowed to edit this user"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_password(
    State(state): State<SettingsState>,
    Extension(principal): Extension<Principal>,
    Query(params): Query<SettingsParams>,
) -> ApiResult<Json<SettingsPage<PasswordSettingsForm>>> {
    ensure_can_edit(&principal, &params)?;
    let user = state
        .user_service
        .find_user_by_username(&params.editable_user)
        .await?;
    let form = PasswordSettingsForm::from(&user);
    Ok(Json(SettingsPage::new(PASSWORD_PAGE, &params, form)))
}

#[utoipa::path(
    post,
    path = "/settings/password",
    tag = "Settings",
    security(("bearer_auth" = [])),
    params(SettingsParams),
    request_body = PasswordSettingsForm,
    responses(
        (status = 303, description = "Password changed"),
        (status = 403, description = "Not allowed to edit this user"),
        (status = 422, description = "Invalid form", body = SettingsPage<PasswordSettingsForm>)
    )
)]
pub async fn update_password(
    State(state): State<SettingsState>,
    Extension(principal): Extension<Principal>,
    Query(params): Query<SettingsParams>,
    CheckedJson(form, errors): CheckedJson<PasswordSettingsForm>,
) -> ApiResult<Response> {
    ensure_can_edit(&principal, &params)?;
    if !errors.is_empty() {
        return Ok(invalid(
            SettingsPage::new(PASSWORD_PAGE, &params, form.redacted()),
            errors,
        ));
    }

    let target = state
        .user_service
        .find_user_by_username(&params.editable_user)
        .await?;
    ensure_same_record(&target, &form.id)?;

    let update = state.user_service.update_user_password(&form).await?;
    info!(
        acting = %principal.username,
        user_id = %update.user.id,
        "Password settings saved"
    );
    updated_redirect(PASSWORD_PAGE, &principal, &update, &state.jwt_config)
}

// ── Knowledges ──────────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/settings/knowledges",
    tag = "Settings",
    security(("bearer_auth" = [])),
    params(SettingsParams),
    responses(
        (status = 200, description = "Knowledge catalog with selection", body = SettingsPage<KnowledgeSettingsForm>),
        (status = 403, description = "Not allowed to edit this user"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_knowledges(
    State(state): State<SettingsState>,
    Extension(principal): Extension<Principal>,
    Query(params): Query<SettingsParams>,
) -> ApiResult<Json<SettingsPage<KnowledgeSettingsForm>>> {
    ensure_can_edit(&principal, &params)?;
    let items = state
        .knowledge_service
        .find_all_knowledges_selected_for_user(&params.editable_user)
        .await?;
    let form = KnowledgeSettingsForm::new(items);
    Ok(Json(SettingsPage::new(KNOWLEDGES_PAGE, &params, form)))
}

#[utoipa::path(
    post,
    path = "/settings/knowledges",
    tag = "Settings",
    security(("bearer_auth" = [])),
    params(SettingsParams),
    request_body = KnowledgeSettingsForm,
    responses(
        (status = 303, description = "Knowledges replaced"),
        (status = 403, description = "Not allowed to edit this user"),
        (status = 422, description = "Unknown knowledge submitted", body = SettingsPage<KnowledgeSettingsForm>)
    )
)]
pub async fn update_knowledges(
    State(state): State<SettingsState>,
    Extension(principal): Extension<Principal>,
    Query(params): Query<SettingsParams>,
    Json(form): Json<KnowledgeSettingsForm>,
) -> ApiResult<Response> {
    ensure_can_edit(&principal, &params)?;
    let selected = match state.knowledge_service.resolve_selection(&form).await {
        Ok(selected) => selected,
        Err(DomainError::Validation(message)) => {
            let errors = FieldErrors::from([("knowledges".to_string(), vec![message])]);
            return Ok(invalid(SettingsPage::new(KNOWLEDGES_PAGE, &params, form), errors));
        }
        Err(e) => return Err(e.into()),
    };

    let saved = state
        .user_service
        .update_user_knowledges(&params.editable_user, selected)
        .await?;

    info!(
        acting = %principal.username,
        user_id = %saved.id,
        count = saved.knowledges.len(),
        "Knowledge settings saved"
    );
    Ok(Redirect::to(&updated_location(KNOWLEDGES_PAGE, &saved.username)).into_response())
}

// ── Skills ──────────────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/settings/skills",
    tag = "Settings",
    security(("bearer_auth" = [])),
    params(SettingsParams),
    responses(
        (status = 200, description = "Skill catalog with selection", body = SettingsPage<SkillSettingsForm>),
        (status = 403, description = "Not allowed to edit this user"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_skills(
    State(state): State<SettingsState>,
    Extension(principal): Extension<Principal>,
    Query(params): Query<SettingsParams>,
) -> ApiResult<Json<SettingsPage<SkillSettingsForm>>> {
    ensure_can_edit(&principal, &params)?;
    let items = state
        .skill_service
        .find_all_skills_selected_for_user(&params.editable_user)
        .await?;
    let form = SkillSettingsForm::new(items);
    Ok(Json(SettingsPage::new(SKILLS_PAGE, &params, form)))
}

#[utoipa::path(
    post,
    path = "/settings/skills",
    tag = "Settings",
    security(("bearer_auth" = [])),
    params(SettingsParams),
    request_body = SkillSettingsForm,
    responses(
        (status = 303, description = "Skills replaced"),
        (status = 403, description = "Not allowed to edit this user"),
        (status = 422, description = "Unknown skill submitted", body = SettingsPage<SkillSettingsForm>)
    )
)]
pub async fn update_skills(
    State(state): State<SettingsState>,
    Extension(principal): Extension<Principal>,
    Query(params): Query<SettingsParams>,
    Json(form): Json<SkillSettingsForm>,
) -> ApiResult<Response> {
    ensure_can_edit(&principal, &params)?;
    let selected = match state.skill_service.resolve_selection(&form).await {
        Ok(selected) => selected,
        Err(DomainError::Validation(message)) => {
            let errors = FieldErrors::from([("skills".to_string(), vec![message])]);
            return Ok(invalid(SettingsPage::new(SKILLS_PAGE, &params, form), errors));
        }
        Err(e) => return Err(e.into()),
    };

    let saved = state
        .user_service
        .update_user_skills(&params.editable_user, selected)
        .await?;

    info!(
        acting = %principal.username,
        user_id = %saved.id,
        count = saved.skills.len(),
        "Skill settings saved"
    );
    Ok(Redirect::to(&updated_location(SKILLS_PAGE, &saved.username)).into_response())
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request};
    use axum::Router;
    use serde_json::{json, Value};

    use super::*;
    use crate::application::test_support::Fixture;
    use crate::domain::UserRole;
    use crate::infrastructure::crypto::jwt::verify_token;
    use crate::interfaces::http::middleware::AuthState;
    use crate::interfaces::http::modules::settings::settings_routes;

    fn jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "settings-test".into(),
            expiration_hours: 1,
            issuer: "user-settings".into(),
        }
    }

    fn app(fx: &Fixture) -> Router {
        let state = SettingsState {
            user_service: fx.user_service.clone(),
            knowledge_service: fx.knowledge_service.clone(),
            skill_service: fx.skill_service.clone(),
            jwt_config: jwt_config(),
        };
        settings_routes(
            state,
            AuthState {
                jwt_config: jwt_config(),
                user_service: fx.user_service.clone(),
            },
        )
    }

    fn bearer(user: &User) -> String {
        let token = create_token(&Principal::from(user), &jwt_config()).unwrap();
        format!("Bearer {token}")
    }

    async fn call(app: Router, req: Request<Body>) -> Response {
        use tower::Service;
        app.into_service().call(req).await.unwrap()
    }

    async fn request(
        fx: &Fixture,
        method: &str,
        uri: &str,
        authorization: &str,
        body: Option<Value>,
    ) -> Response {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, authorization);
        let req = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        call(app(fx), req).await
    }

    async fn get(fx: &Fixture, uri: &str, as_user: &User) -> Response {
        request(fx, "GET", uri, &bearer(as_user), None).await
    }

    async fn post(fx: &Fixture, uri: &str, as_user: &User, body: Value) -> Response {
        request(fx, "POST", uri, &bearer(as_user), Some(body)).await
    }

    async fn json_body(resp: Response) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn location(resp: &Response) -> &str {
        resp.headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
    }

    #[tokio::test]
    async fn profile_page_is_prefilled() {
        let fx = Fixture::new();
        let alice = fx.seed_user("alice", "password1").await;

        let resp = get(&fx, "/settings/profile?editableUser=alice", &alice).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let page = json_body(resp).await;
        assert_eq!(page["activePage"], "profile");
        assert_eq!(page["editableUser"], "alice");
        assert_eq!(page["userUpdated"], false);
        assert_eq!(page["form"]["id"], alice.id.as_str());
        assert_eq!(page["form"]["email"], "alice@example.com");
    }

    #[tokio::test]
    async fn settings_root_serves_profile() {
        let fx = Fixture::new();
        let alice = fx.seed_user("alice", "password1").await;

        for uri in ["/settings?editableUser=alice", "/settings/?editableUser=alice"] {
            let resp = get(&fx, uri, &alice).await;
            assert_eq!(resp.status(), StatusCode::OK);
            assert_eq!(json_body(resp).await["activePage"], "profile");
        }
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized() {
        let fx = Fixture::new();
        fx.seed_user("alice", "password1").await;

        let req = Request::builder()
            .uri("/settings/profile?editableUser=alice")
            .body(Body::empty())
            .unwrap();
        assert_eq!(call(app(&fx), req).await.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn other_users_settings_are_forbidden_for_employees() {
        let fx = Fixture::new();
        let alice = fx.seed_user("alice", "password1").await;
        let bob = fx.seed_user("bob", "password1").await;

        let resp = get(&fx, "/settings/profile?editableUser=bob", &alice).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let form = json!({
            "id": bob.id,
            "name": "Hacked",
            "username": "bob",
            "email": "bob@example.com",
        });
        let resp = post(&fx, "/settings/profile?editableUser=bob", &alice, form).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let stored = fx.user_service.find_user_by_username("bob").await.unwrap();
        assert_eq!(stored.name, "BOB");
    }

    #[tokio::test]
    async fn hr_may_view_any_user() {
        let fx = Fixture::new();
        fx.seed_user("alice", "password1").await;
        let hr = fx.seed_hr("hr", "password1").await;
        assert_eq!(hr.role, UserRole::Hr);

        let resp = get(&fx, "/settings/password?editableUser=alice", &hr).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let page = json_body(resp).await;
        assert_eq!(page["activePage"], "password");
        assert_eq!(page["form"]["new_password"], "");
    }

    #[tokio::test]
    async fn unknown_editable_user_is_not_found() {
        let fx = Fixture::new();
        let hr = fx.seed_hr("hr", "password1").await;

        let resp = get(&fx, "/settings/profile?editableUser=ghost", &hr).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn self_rename_redirects_with_fresh_token() {
        let fx = Fixture::new();
        let alice = fx.seed_user("alice", "password1").await;

        let form = json!({
            "id": alice.id,
            "name": "Alice Liddell",
            "username": "alice2",
            "email": "alice2@example.com",
        });
        let resp = post(&fx, "/settings/profile?editableUser=alice", &alice, form).await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            location(&resp),
            "/settings/profile?editableUser=alice2&userUpdated=true"
        );

        let token = resp
            .headers()
            .get(SESSION_TOKEN_HEADER)
            .unwrap()
            .to_str()
            .unwrap();
        let claims = verify_token(token, &jwt_config()).unwrap();
        assert_eq!(claims.username, "alice2");

        let stored = fx.user_service.find_user_by_username("alice2").await.unwrap();
        assert_eq!(stored.name, "Alice Liddell");
    }

    #[tokio::test]
    async fn hr_edit_of_other_user_keeps_session() {
        let fx = Fixture::new();
        let alice = fx.seed_user("alice", "password1").await;
        let hr = fx.seed_hr("hr", "password1").await;

        let form = json!({
            "id": alice.id,
            "name": "Alice",
            "username": "alice",
            "email": "new@example.com",
        });
        let resp = post(&fx, "/settings/profile?editableUser=alice", &hr, form).await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert!(resp.headers().get(SESSION_TOKEN_HEADER).is_none());
    }

    #[tokio::test]
    async fn invalid_profile_rerenders_with_errors() {
        let fx = Fixture::new();
        let alice = fx.seed_user("alice", "password1").await;

        let form = json!({
            "id": alice.id,
            "name": "",
            "username": "alice",
            "email": "nope",
        });
        let resp = post(&fx, "/settings/profile?editableUser=alice", &alice, form).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let page = json_body(resp).await;
        assert_eq!(page["form"]["email"], "nope");
        assert!(page["errors"]["name"].is_array());
        assert!(page["errors"]["email"].is_array());

        let stored = fx.user_service.find_user_by_username("alice").await.unwrap();
        assert_eq!(stored.email, "alice@example.com");
    }

    #[tokio::test]
    async fn form_for_another_record_is_forbidden() {
        let fx = Fixture::new();
        let alice = fx.seed_user("alice", "password1").await;
        let bob = fx.seed_user("bob", "password1").await;

        let form = json!({
            "id": bob.id,
            "name": "Bob",
            "username": "bob",
            "email": "mallory@example.com",
        });
        let resp = post(&fx, "/settings/profile?editableUser=alice", &alice, form).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let stored = fx.user_service.find_user_by_username("bob").await.unwrap();
        assert_eq!(stored.email, "bob@example.com");
    }

    #[tokio::test]
    async fn taken_username_conflicts() {
        let fx = Fixture::new();
        let alice = fx.seed_user("alice", "password1").await;
        fx.seed_user("bob", "password1").await;

        let form = json!({
            "id": alice.id,
            "name": "Alice",
            "username": "bob",
            "email": "alice@example.com",
        });
        let resp = post(&fx, "/settings/profile?editableUser=alice", &alice, form).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn password_change_allows_new_login() {
        let fx = Fixture::new();
        let alice = fx.seed_user("alice", "password1").await;

        let form = json!({
            "id": alice.id,
            "new_password": "brand-new-pass",
            "confirm_password": "brand-new-pass",
        });
        let resp = post(&fx, "/settings/password?editableUser=alice", &alice, form).await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            location(&resp),
            "/settings/password?editableUser=alice&userUpdated=true"
        );
        assert!(fx.user_service.authenticate("alice", "brand-new-pass").await.is_ok());
        assert!(fx.user_service.authenticate("alice", "password1").await.is_err());
    }

    #[tokio::test]
    async fn mismatched_passwords_are_not_echoed() {
        let fx = Fixture::new();
        let alice = fx.seed_user("alice", "password1").await;

        let form = json!({
            "id": alice.id,
            "new_password": "brand-new-pass",
            "confirm_password": "other-pass-123",
        });
        let resp = post(&fx, "/settings/password?editableUser=alice", &alice, form).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let page = json_body(resp).await;
        assert_eq!(page["form"]["new_password"], "");
        assert_eq!(page["form"]["confirm_password"], "");
        assert!(page["errors"]["confirm_password"].is_array());
        assert!(fx.user_service.authenticate("alice", "password1").await.is_ok());
    }

    #[tokio::test]
    async fn knowledges_page_marks_selection() {
        let fx = Fixture::new();
        let rust = fx.seed_knowledge("Rust").await;
        fx.seed_knowledge("Go").await;
        let mut alice = fx.seed_user("alice", "password1").await;
        alice.knowledges.insert(rust);
        let alice = fx.user_service.save(alice).await.unwrap();

        let resp = get(&fx, "/settings/knowledges?editableUser=alice", &alice).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let page = json_body(resp).await;
        let items = page["form"]["knowledges"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["label"], "Go");
        assert_eq!(items[0]["selected"], false);
        assert_eq!(items[1]["label"], "Rust");
        assert_eq!(items[1]["selected"], true);
    }

    #[tokio::test]
    async fn knowledges_submission_replaces_the_set() {
        let fx = Fixture::new();
        let rust = fx.seed_knowledge("Rust").await;
        let go = fx.seed_knowledge("Go").await;
        let mut alice = fx.seed_user("alice", "password1").await;
        alice.knowledges.insert(rust.clone());
        let alice = fx.user_service.save(alice).await.unwrap();

        // warm the cache so the write must invalidate it
        fx.knowledge_service
            .find_all_knowledges_selected_for_user("alice")
            .await
            .unwrap();

        let form = json!({
            "knowledges": [
                {"knowledge_id": rust.id, "label": "Rust", "selected": false},
                {"knowledge_id": go.id, "label": "Go", "selected": true},
            ]
        });
        let resp = post(&fx, "/settings/knowledges?editableUser=alice", &alice, form).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            location(&resp),
            "/settings/knowledges?editableUser=alice&userUpdated=true"
        );

        let stored = fx.user_service.find_user_by_username("alice").await.unwrap();
        assert!(stored.has_knowledge(go.id));
        assert!(!stored.has_knowledge(rust.id));

        let resp = get(&fx, "/settings/knowledges?editableUser=alice", &alice).await;
        let page = json_body(resp).await;
        let selected: Vec<&str> = page["form"]["knowledges"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|k| k["selected"] == true)
            .map(|k| k["label"].as_str().unwrap())
            .collect();
        assert_eq!(selected, vec!["Go"]);
    }

    #[tokio::test]
    async fn unknown_knowledge_rejects_whole_submission() {
        let fx = Fixture::new();
        let rust = fx.seed_knowledge("Rust").await;
        let alice = fx.seed_user("alice", "password1").await;

        let form = json!({
            "knowledges": [
                {"knowledge_id": rust.id, "selected": true},
                {"knowledge_id": 999, "selected": true},
            ]
        });
        let resp = post(&fx, "/settings/knowledges?editableUser=alice", &alice, form).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let page = json_body(resp).await;
        assert!(page["errors"]["knowledges"].is_array());

        let stored = fx.user_service.find_user_by_username("alice").await.unwrap();
        assert!(stored.knowledges.is_empty());
    }

    #[tokio::test]
    async fn skills_submission_replaces_the_set() {
        let fx = Fixture::new();
        let talk = fx.seed_skill("Communication").await;
        let lead = fx.seed_skill("Leadership").await;
        let mut alice = fx.seed_user("alice", "password1").await;
        alice.skills.insert(talk.clone());
        let alice = fx.user_service.save(alice).await.unwrap();

        let form = json!({
            "skills": [
                {"skill_id": lead.id, "label": "Leadership", "selected": true},
            ]
        });
        let resp = post(&fx, "/settings/skills?editableUser=alice", &alice, form).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);

        let stored = fx.user_service.find_user_by_username("alice").await.unwrap();
        assert!(stored.has_skill(lead.id));
        assert!(!stored.has_skill(talk.id));

        let resp = get(&fx, "/settings/skills?editableUser=alice", &alice).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json_body(resp).await["activePage"], "skills");
    }

    #[tokio::test]
    async fn hr_can_replace_other_users_skills() {
        let fx = Fixture::new();
        let talk = fx.seed_skill("Communication").await;
        fx.seed_user("alice", "password1").await;
        let hr = fx.seed_hr("hr", "password1").await;

        let form = json!({"skills": [{"skill_id": talk.id, "selected": true}]});
        let resp = post(&fx, "/settings/skills?editableUser=alice", &hr, form).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);

        let stored = fx.user_service.find_user_by_username("alice").await.unwrap();
        assert!(stored.has_skill(talk.id));
    }

    #[tokio::test]
    async fn every_settings_route_rejects_other_employees() {
        let fx = Fixture::new();
        let rust = fx.seed_knowledge("Rust").await;
        let go = fx.seed_knowledge("Go").await;
        let talk = fx.seed_skill("Communication").await;
        let alice = fx.seed_user("alice", "password1").await;
        let mut bob = fx.seed_user("bob", "password1").await;
        bob.knowledges.insert(rust.clone());
        bob.skills.insert(talk.clone());
        let bob = fx.user_service.save(bob).await.unwrap();

        // unknown catalog ids would answer 422 if the body were ever read
        let routes: Vec<(&str, &str, Option<Value>)> = vec![
            ("GET", "/settings?editableUser=bob", None),
            ("GET", "/settings/profile?editableUser=bob", None),
            (
                "POST",
                "/settings/profile?editableUser=bob",
                Some(json!({
                    "id": bob.id,
                    "name": "Hacked",
                    "username": "mallory",
                    "email": "mallory@example.com",
                })),
            ),
            ("GET", "/settings/password?editableUser=bob", None),
            (
                "POST",
                "/settings/password?editableUser=bob",
                Some(json!({
                    "id": bob.id,
                    "new_password": "taken-over",
                    "confirm_password": "taken-over",
                })),
            ),
            ("GET", "/settings/knowledges?editableUser=bob", None),
            (
                "POST",
                "/settings/knowledges?editableUser=bob",
                Some(json!({"knowledges": [
                    {"knowledge_id": go.id, "selected": true},
                    {"knowledge_id": 999, "selected": true},
                ]})),
            ),
            ("GET", "/settings/skills?editableUser=bob", None),
            (
                "POST",
                "/settings/skills?editableUser=bob",
                Some(json!({"skills": [{"skill_id": 999, "selected": true}]})),
            ),
        ];

        for (method, uri, body) in routes {
            let resp = request(&fx, method, uri, &bearer(&alice), body).await;
            assert_eq!(resp.status(), StatusCode::FORBIDDEN, "{method} {uri}");
        }

        let stored = fx.user_service.find_user_by_username("bob").await.unwrap();
        assert_eq!(stored.name, "BOB");
        assert_eq!(stored.knowledges, bob.knowledges);
        assert_eq!(stored.skills, bob.skills);
        assert!(fx.user_service.authenticate("bob", "password1").await.is_ok());
    }

    #[tokio::test]
    async fn token_from_before_rename_cannot_edit_new_owner_of_old_name() {
        let fx = Fixture::new();
        let alice = fx.seed_user("alice", "password1").await;
        let old_token = bearer(&alice);

        let form = json!({
            "id": alice.id,
            "name": "Alice",
            "username": "alice2",
            "email": "alice2@example.com",
        });
        let resp = post(&fx, "/settings/profile?editableUser=alice", &alice, form).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        let fresh_token = resp
            .headers()
            .get(SESSION_TOKEN_HEADER)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();

        let newcomer = fx.seed_user("alice", "newcomer-pass").await;

        let resp = request(
            &fx,
            "GET",
            "/settings/profile?editableUser=alice",
            &old_token,
            None,
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let form = json!({
            "id": newcomer.id,
            "new_password": "taken-over",
            "confirm_password": "taken-over",
        });
        let resp = request(
            &fx,
            "POST",
            "/settings/password?editableUser=alice",
            &old_token,
            Some(form.clone()),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        // the renamed account's fresh session is scoped to alice2
        let resp = request(
            &fx,
            "POST",
            "/settings/password?editableUser=alice",
            &format!("Bearer {fresh_token}"),
            Some(form),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        assert!(fx
            .user_service
            .authenticate("alice", "newcomer-pass")
            .await
            .is_ok());
        assert!(fx
            .user_service
            .authenticate("alice", "taken-over")
            .await
            .is_err());
    }
}
