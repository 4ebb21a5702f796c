//! Model metadata handler

use axum::{extract::State, Json};

use crate::logic::features::FEATURE_LAYOUT;
use crate::models::{ModelInfoResponse, ThresholdInfo};
use crate::AppState;

pub async fn info(State(state): State<AppState>) -> Json<ModelInfoResponse> {
    let thresholds = state.policy.thresholds();

    Json(ModelInfoResponse {
        model: state.models.model_info().cloned(),
        scaler: state.models.scaler_info().cloned(),
        supports_proba: state.models.supports_proba(),
        thresholds: ThresholdInfo {
            prediabetes: thresholds.prediabetes(),
            diabetes: thresholds.diabetes(),
        },
        feature_layout: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        explanation_rules: state.policy.rules().len(),
    })
}
