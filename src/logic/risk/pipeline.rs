//! Prediction Pipeline
//!
//! raw vector -> scaler -> classifier -> policy tier + explanation factors.
//! Pure computation over the shared artifacts; nothing is mutated.

use serde::Serialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::logic::features::{FeatureVector, PatientData};
use crate::logic::model::{InferenceError, ModelContext};
use super::policy::RiskTier;
use super::RiskPolicy;

/// Transient result of one assessment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub probability: f64,
    pub tier: RiskTier,
    pub factors: Vec<String>,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("model artifacts not loaded")]
    ServiceUnavailable,

    #[error("invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

/// Run one assessment end to end
pub fn assess(
    ctx: &ModelContext,
    policy: &RiskPolicy,
    patient: &PatientData,
) -> Result<RiskAssessment, PipelineError> {
    let (scaler, model) = ctx.artifacts().ok_or(PipelineError::ServiceUnavailable)?;
    // Returns before any stage runs: scaler, model, policy and rules all
    // sit below this line.
    patient.validate()?;

    let raw = FeatureVector::from(patient);
    let scaled = scaler.transform(&raw)?;

    let probability = if ctx.supports_proba() {
        model.predict_proba(&scaled)?
    } else {
        f64::from(model.predict_label(&scaled)?)
    };
    if !(0.0..=1.0).contains(&probability) {
        return Err(InferenceError::InvalidOutput(format!("probability {} outside [0, 1]", probability)).into());
    }

    let tier = policy.thresholds().classify(probability);
    let factors = policy.rules().explain(&raw);

    Ok(RiskAssessment {
        probability,
        tier,
        factors,
    })
}
