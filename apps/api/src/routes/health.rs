//! Health check.
//!
//! 200 when the database answers and every embedded migration is applied,
//! 503 otherwise.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::warn;

use medlocus_db::migrations::migration_status;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub migrations: Option<MigrationCounts>,
}

#[derive(Debug, Serialize)]
pub struct MigrationCounts {
    pub applied: usize,
    pub total: usize,
}

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let unavailable = |database| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "unavailable",
                database,
                migrations: None,
            }),
        )
    };

    if !state.db.health_check().await {
        warn!("Health check: database unreachable");
        return unavailable("unreachable");
    }

    match migration_status(state.db.pool()).await {
        Ok((total, applied)) => {
            let status = if applied >= total {
                StatusCode::OK
            } else {
                StatusCode::SERVICE_UNAVAILABLE
            };
            (
                status,
                Json(HealthResponse {
                    status: if status == StatusCode::OK { "healthy" } else { "migrating" },
                    database: "connected",
                    migrations: Some(MigrationCounts { applied, total }),
                }),
            )
        }
        Err(e) => {
            warn!(error = %e, "Health check: migration status unavailable");
            unavailable("connected")
        }
    }
}
