//! Liveness and database health endpoints.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub db: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl HealthResponse {
    pub fn connected() -> Self {
        Self {
            status: "ok".to_string(),
            db: "connected".to_string(),
            detail: None,
        }
    }

    pub fn degraded(detail: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            db: "not connected".to_string(),
            detail: Some(detail.into()),
        }
    }
}

/// GET / - liveness marker, never touches the database
pub async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        status: "ok".to_string(),
        message: format!("{} running", state.settings.server.service_name),
    })
}

/// GET /health - database probe
///
/// Always answers 200; a failed probe is reported in the body.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    match state.catalog.ping().await {
        Ok(()) => Json(HealthResponse::connected()),
        Err(e) => {
            tracing::warn!(
                backend = state.catalog.backend_name(),
                error = %e,
                "Database health check failed"
            );
            Json(HealthResponse::degraded(e.to_string()))
        }
    }
}
