use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{error::ApiError, response::ApiResponse};
use crate::{
    controller::{snapshot::fan_status_text, AppState},
    domain, export,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/status", get(get_status))
        .route("/history", get(get_history))
        .route("/stats", get(get_stats))
        .route("/alerts", get(get_alerts))
        .route("/fan/toggle", post(toggle_fan))
        .route("/fan/auto", post(auto_fan))
        .route("/system/active", put(set_active))
        .route("/export.csv", get(export_csv))
        .route("/healthz", get(healthz))
        .with_state(state)
}

pub async fn healthz() -> impl IntoResponse {
    StatusCode::OK
}

pub async fn get_status(State(st): State<AppState>) -> impl IntoResponse {
    Json(st.monitor.snapshot().await)
}

pub async fn get_history(State(st): State<AppState>) -> impl IntoResponse {
    let state = st.monitor.state().await;
    let readings = state.history.snapshot();
    let count = readings.len();
    ApiResponse::success(readings)
        .with_count(count)
        .with_capacity(state.history.capacity())
}

pub async fn get_stats(State(st): State<AppState>) -> impl IntoResponse {
    Json(st.monitor.state().await.history.aggregate())
}

pub async fn get_alerts(State(st): State<AppState>) -> impl IntoResponse {
    let advisories = domain::advisories(&st.monitor.state().await.reading);
    let count = advisories.len();
    ApiResponse::success(advisories).with_count(count)
}

#[derive(Debug, Serialize)]
pub struct FanResponse {
    pub fan_on: bool,
    pub fan_status: &'static str,
}

impl FanResponse {
    fn new(fan_on: bool) -> Self {
        Self {
            fan_on,
            fan_status: fan_status_text(fan_on),
        }
    }
}

pub async fn toggle_fan(State(st): State<AppState>) -> impl IntoResponse {
    Json(FanResponse::new(st.monitor.toggle_fan().await))
}

pub async fn auto_fan(State(st): State<AppState>) -> impl IntoResponse {
    Json(FanResponse::new(st.monitor.auto_fan().await))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SystemActiveRequest {
    pub active: bool,
}

pub async fn set_active(
    State(st): State<AppState>,
    payload: Result<Json<SystemActiveRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let active = st.monitor.set_active(req.active).await;
    Ok(Json(SystemActiveRequest { active }))
}

pub async fn export_csv(State(st): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let readings = st.monitor.history().await;
    if readings.is_empty() {
        return Err(ApiError::Conflict("no readings recorded yet".to_string()));
    }

    let filename = export::export_filename(Utc::now());
    let body = export::to_csv(readings.iter());
    tracing::info!(rows = readings.len(), %filename, "exported session history");

    Ok((
        [
            (header::CONTENT_TYPE, export::CSV_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    ))
}
