//! Service health, mounted at `/health` outside `/api/v1` and without auth.
//!
//! The catalog needs two things to serve requests: the database and the
//! media root directory for cover uploads. Either one missing reports
//! `degraded`; the endpoint answers 200 either way.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Degraded,
}

/// `GET /health` response body.
#[derive(Debug, Serialize)]
pub struct ServiceHealth {
    pub status: HealthStatus,
    pub version: &'static str,
    pub db_healthy: bool,
    pub media_healthy: bool,
}

impl ServiceHealth {
    fn from_checks(db_healthy: bool, media_healthy: bool) -> Self {
        let status = if db_healthy && media_healthy {
            HealthStatus::Ok
        } else {
            HealthStatus::Degraded
        };

        ServiceHealth {
            status,
            version: env!("CARGO_PKG_VERSION"),
            db_healthy,
            media_healthy,
        }
    }
}

async fn service_health(State(state): State<AppState>) -> Json<ServiceHealth> {
    let db_healthy = match bookshelf_db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, "Database unreachable from health check");
            false
        }
    };

    let media_healthy = state.storage.is_ready().await;
    if !media_healthy {
        tracing::warn!(root = %state.storage.root().display(), "Media root is not a directory");
    }

    Json(ServiceHealth::from_checks(db_healthy, media_healthy))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(service_health))
}
