//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{KnowledgeService, SkillService, UserService};
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::interfaces::http::middleware::AuthState;
use crate::interfaces::http::modules::request_id::request_id_middleware;
use crate::interfaces::http::modules::{auth, health, metrics, settings, users};

/// Everything the HTTP layer needs from the rest of the application
#[derive(Clone)]
pub struct ApiContext {
    pub user_service: Arc<UserService>,
    pub knowledge_service: Arc<KnowledgeService>,
    pub skill_service: Arc<SkillService>,
    pub jwt_config: JwtConfig,
    pub db: Option<DatabaseConnection>,
    pub prometheus: PrometheusHandle,
}

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::login,
        auth::register,
        auth::get_current_user,
        // Settings
        settings::get_profile,
        settings::update_profile,
        settings::get_password,
        settings::update_password,
        settings::get_knowledges,
        settings::update_knowledges,
        settings::get_skills,
        settings::update_skills,
        // HR directory
        users::find_users,
        users::get_user_knowledges,
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Authentication", description = "Login, registration and current user"),
        (name = "Settings", description = "Profile, password, knowledge and skill settings"),
        (name = "Users", description = "HR directory lookups")
    ),
    info(
        title = "User Settings API",
        version = "0.1.0",
        description = "Self-service and HR-assisted user settings"
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(ctx: ApiContext) -> Router {
    let auth_state = AuthState {
        jwt_config: ctx.jwt_config.clone(),
        user_service: ctx.user_service.clone(),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([
            axum::http::HeaderName::from_static(super::middleware::SESSION_TOKEN_HEADER),
            axum::http::HeaderName::from_static(
                crate::interfaces::http::modules::request_id::REQUEST_ID_HEADER,
            ),
        ]);

    let auth_routes = auth::auth_routes(
        auth::AuthHandlerState {
            user_service: ctx.user_service.clone(),
            jwt_config: ctx.jwt_config.clone(),
        },
        auth_state.clone(),
    );

    let settings_routes = settings::settings_routes(
        settings::SettingsState {
            user_service: ctx.user_service.clone(),
            knowledge_service: ctx.knowledge_service.clone(),
            skill_service: ctx.skill_service.clone(),
            jwt_config: ctx.jwt_config.clone(),
        },
        auth_state.clone(),
    );

    let user_routes = users::user_routes(
        users::UserHandlerState {
            user_service: ctx.user_service.clone(),
        },
        auth_state,
    );

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health::HealthState {
            db: ctx.db.clone(),
            started_at: Arc::new(Instant::now()),
        });

    let metrics_routes = Router::new()
        .route("/metrics", get(metrics::prometheus_metrics))
        .with_state(metrics::MetricsState {
            handle: ctx.prometheus,
        });

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(swagger_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .merge(auth_routes)
        .merge(settings_routes)
        .merge(user_routes)
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
