use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::controller::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    timestamp: DateTime<Utc>,
    session_id: Uuid,
    checks: HealthChecks,
}

/// Individual health checks
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    simulation: ComponentHealth,
}

/// Health status of a component
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

impl ComponentHealth {
    fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            detail: None,
        }
    }

    fn paused(detail: String) -> Self {
        Self {
            status: "paused".to_string(),
            detail: Some(detail),
        }
    }
}

/// GET /health - Health check endpoint
///
/// A paused simulation is reported but does not make the service unhealthy.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let monitor = state.monitor.state().await;

    let simulation = if monitor.is_active {
        ComponentHealth::healthy()
    } else {
        ComponentHealth::paused(format!(
            "simulation inactive at version {}",
            monitor.version
        ))
    };

    let response = HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        session_id: state.monitor.session_id(),
        checks: HealthChecks { simulation },
    };

    (StatusCode::OK, Json(response))
}

/// GET /health/ready - Readiness probe
pub async fn readiness_check() -> impl IntoResponse {
    StatusCode::OK
}

/// GET /health/live - Liveness probe
pub async fn liveness_check() -> impl IntoResponse {
    StatusCode::OK
}
