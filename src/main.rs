//! User Settings Service
//!
//! REST API for user profile, password, knowledge and skill settings.
//! Reads configuration from TOML file (~/.config/user-settings/config.toml).

use std::sync::Arc;

use tracing::{error, info, warn};

use user_settings::application::{
    create_cache, KnowledgeService, RepositoryAuthenticationManager, SkillService, UserService,
};
use user_settings::config::AppConfig;
use user_settings::domain::{User, UserRepositoryInterface, UserRole};
use user_settings::infrastructure::crypto::password::BcryptPasswordEncoder;
use user_settings::infrastructure::database::repositories::{
    KnowledgeRepository, SkillRepository, UserRepository,
};
use user_settings::{
    create_api_router, default_config_path, init_database, run_migrations, ApiContext,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = default_config_path();
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting User Settings Service...");

    // ── Prometheus metrics recorder (before any metrics calls) ──
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()?;
    user_settings::interfaces::http::modules::metrics::describe_metrics();

    let jwt_config = app_cfg.jwt_config();
    info!(
        "JWT configured with {}h token expiration",
        jwt_config.expiration_hours
    );

    // ── Database ───────────────────────────────────────────────
    let db = match init_database(&app_cfg.database).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    if let Err(e) = run_migrations(&db).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }

    // ── Services ───────────────────────────────────────────────
    let users: Arc<dyn UserRepositoryInterface> = Arc::new(UserRepository::new(db.clone()));
    let knowledges = Arc::new(KnowledgeRepository::new(db.clone()));
    let skills = Arc::new(SkillRepository::new(db.clone()));

    let password_encoder = Arc::new(BcryptPasswordEncoder::new(app_cfg.security.bcrypt_cost));
    let cache = create_cache(app_cfg.cache.enabled);
    info!(enabled = app_cfg.cache.enabled, "Settings cache configured");

    let authentication_manager = Arc::new(RepositoryAuthenticationManager::new(
        users.clone(),
        password_encoder.clone(),
    ));
    let user_service = Arc::new(UserService::new(
        users.clone(),
        password_encoder,
        authentication_manager,
        cache.clone(),
    ));
    let knowledge_service = Arc::new(KnowledgeService::new(knowledges, users.clone(), cache.clone()));
    let skill_service = Arc::new(SkillService::new(skills, users.clone(), cache));

    knowledge_service
        .seed_catalog(&app_cfg.catalog.knowledges)
        .await?;
    skill_service.seed_catalog(&app_cfg.catalog.skills).await?;

    create_default_admin(users.as_ref(), &user_service, &app_cfg).await;

    // ── REST API ───────────────────────────────────────────────
    let api_router = create_api_router(ApiContext {
        user_service,
        knowledge_service,
        skill_service,
        jwt_config,
        db: Some(db.clone()),
        prometheus: prometheus_handle,
    });

    let api_addr = app_cfg.server.address();
    let listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("REST API server listening on http://{}", api_addr);
    info!("Swagger UI available at http://{}/docs/", api_addr);

    axum::serve(listener, api_router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("🧹 Performing final cleanup...");
    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    } else {
        info!("✅ Database connection closed");
    }

    info!("👋 User Settings Service shutdown complete");
    Ok(())
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("🛑 Shutdown signal received");
}

/// Create the HR account from config when no users exist yet
async fn create_default_admin(
    users: &dyn UserRepositoryInterface,
    user_service: &UserService,
    app_cfg: &AppConfig,
) {
    match users.count().await {
        Ok(0) => {}
        Ok(_) => return,
        Err(e) => {
            error!("Failed to count users: {}", e);
            return;
        }
    }

    info!("Creating default HR user...");
    let admin = &app_cfg.admin;
    let user = User::new(
        admin.username.clone(),
        admin.email.clone(),
        admin.name.clone(),
        admin.password.clone(),
    )
    .with_role(UserRole::Hr);

    match user_service.save(user).await {
        Ok(saved) => {
            info!("Default HR user created: {}", saved.username);
            warn!("⚠️  Please change the default HR password immediately!");
        }
        Err(e) => error!("Failed to create default HR user: {}", e),
    }
}
