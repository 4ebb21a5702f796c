//! Prediction handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::Value;
use uuid::Uuid;

use crate::logic::features::{FeatureVector, PatientData};
use crate::logic::risk::assess;
use crate::models::PredictResponse;
use crate::{AppError, AppResult, AppState};

/// Score one patient
///
/// Artifact readiness is checked before the body, so a degraded server
/// answers 503 whatever the client sent. The body is decoded field by field
/// so every missing or mistyped field shows up in the error details.
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<PredictResponse>> {
    if !state.models.is_ready() {
        tracing::warn!("Prediction rejected: model artifacts not loaded");
        return Err(AppError::ServiceUnavailable);
    }

    let Json(body) = payload?;
    let patient = PatientData::from_json(body)?;
    let request_id = Uuid::new_v4();

    tracing::debug!(
        %request_id,
        features = %FeatureVector::from(&patient).to_log_entry(),
        "Prediction requested"
    );

    let assessment = assess(&state.models, &state.policy, &patient).map_err(|e| {
        tracing::warn!(%request_id, "Prediction failed: {}", e);
        AppError::from(e)
    })?;

    tracing::info!(
        %request_id,
        tier = %assessment.tier,
        probability = assessment.probability,
        factors = assessment.factors.len(),
        "Prediction completed"
    );

    Ok(Json(PredictResponse::from_assessment(assessment, state.policy.thresholds())))
}
