//! Test doubles for the artifact traits

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::logic::features::{FeatureVector, FEATURE_COUNT};
use super::classifier::RiskModel;
use super::error::InferenceError;
use super::scaler::{Scaler, ScalerParams};
use super::ModelContext;

/// Classifier returning a fixed probability and counting calls
pub struct StubModel {
    pub probability: f64,
    pub fail: bool,
    pub calls: Arc<AtomicUsize>,
}

impl StubModel {
    pub fn returning(probability: f64) -> Self {
        Self {
            probability,
            fail: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::returning(0.0)
        }
    }
}

impl RiskModel for StubModel {
    fn predict_proba(&self, _scaled: &FeatureVector) -> Result<f64, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(InferenceError::Backend("stub failure".to_string()));
        }
        Ok(self.probability)
    }

    fn predict_label(&self, scaled: &FeatureVector) -> Result<u8, InferenceError> {
        self.predict_proba(scaled).map(|p| u8::from(p >= 0.5))
    }

    fn supports_proba(&self) -> bool {
        true
    }

    fn kind(&self) -> &'static str {
        "stub"
    }
}

pub fn identity_scaler() -> ScalerParams {
    ScalerParams::Standard {
        mean: vec![0.0; FEATURE_COUNT],
        scale: vec![1.0; FEATURE_COUNT],
        feature_names: None,
    }
}

/// Ready context around a stub model; the returned counter tracks model calls
pub fn stub_context(probability: f64) -> (ModelContext, Arc<AtomicUsize>) {
    let model = StubModel::returning(probability);
    let calls = model.calls.clone();
    let model: Arc<dyn RiskModel> = Arc::new(model);
    let scaler: Arc<dyn Scaler> = Arc::new(identity_scaler());
    (ModelContext::from_parts(Some(scaler), Some(model)), calls)
}
