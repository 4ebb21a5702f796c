//! Health and model metadata models

use serde::{Deserialize, Serialize};

use crate::logic::model::ArtifactInfo;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub version: String,
    pub model_ready: bool,
    pub scaler_ready: bool,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdInfo {
    pub prediabetes: f64,
    pub diabetes: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfoResponse {
    pub model: Option<ArtifactInfo>,
    pub scaler: Option<ArtifactInfo>,
    pub supports_proba: bool,
    pub thresholds: ThresholdInfo,
    pub feature_layout: Vec<String>,
    pub explanation_rules: usize,
}
