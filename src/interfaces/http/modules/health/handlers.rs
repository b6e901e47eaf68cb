//! Health check handler: process uptime plus a database ping

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct HealthState {
    /// `None` when running on in-memory repositories
    pub db: Option<DatabaseConnection>,
    pub started_at: Arc<Instant>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub database: ComponentHealth,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ComponentHealth {
    pub status: String,
    pub latency_ms: Option<u64>,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is degraded", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let database = match &state.db {
        Some(db) => {
            let start = Instant::now();
            let ping = db
                .execute(Statement::from_string(
                    db.get_database_backend(),
                    "SELECT 1".to_string(),
                ))
                .await;
            match ping {
                Ok(_) => ComponentHealth {
                    status: "up".to_string(),
                    latency_ms: Some(start.elapsed().as_millis() as u64),
                },
                Err(e) => {
                    tracing::warn!(error = %e, "Database health check failed");
                    ComponentHealth {
                        status: "down".to_string(),
                        latency_ms: None,
                    }
                }
            }
        }
        None => ComponentHealth {
            status: "in-memory".to_string(),
            latency_ms: None,
        },
    };

    let healthy = database.status != "down";
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse {
            status: if healthy { "healthy" } else { "degraded" }.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: state.started_at.elapsed().as_secs(),
            database,
        }),
    )
}
