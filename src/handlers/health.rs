//! Health check handler
//!
//! Always 200: the probe reports artifact readiness but never depends on it.

use axum::{extract::State, Json};

use crate::models::HealthResponse;
use crate::AppState;

pub const SERVICE_MESSAGE: &str = "API de Predicción de Diabetes funcionando correctamente";

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let model_ready = state.models.model_ready();
    let scaler_ready = state.models.scaler_ready();
    let status = if model_ready && scaler_ready { "healthy" } else { "degraded" };

    Json(HealthResponse {
        status: status.to_string(),
        message: SERVICE_MESSAGE.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model_ready,
        scaler_ready,
        timestamp: chrono::Utc::now().timestamp(),
    })
}
