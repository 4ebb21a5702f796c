//! Preprocessing Stage - feature scaling fitted during offline training

use serde::{Deserialize, Serialize};

use crate::logic::features::{FeatureVector, FEATURE_COUNT, FEATURE_LAYOUT};
use super::error::InferenceError;

/// Maps a raw vector to the normalized space the classifier was trained in
pub trait Scaler: Send + Sync {
    fn transform(&self, raw: &FeatureVector) -> Result<FeatureVector, InferenceError>;
    fn kind(&self) -> &'static str;
}

// ============================================================================
// JSON ARTIFACT
// ============================================================================

/// Scaler parameters exported from training
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerParams {
    /// (x - mean) / scale
    Standard {
        mean: Vec<f64>,
        scale: Vec<f64>,
        #[serde(default)]
        feature_names: Option<Vec<String>>,
    },
    /// (x - min) / (max - min)
    MinMax {
        min_vals: Vec<f64>,
        max_vals: Vec<f64>,
        #[serde(default)]
        feature_names: Option<Vec<String>>,
    },
}

impl ScalerParams {
    fn feature_names(&self) -> Option<&[String]> {
        match self {
            ScalerParams::Standard { feature_names, .. }
            | ScalerParams::MinMax { feature_names, .. } => feature_names.as_deref(),
        }
    }
}

impl Scaler for ScalerParams {
    fn transform(&self, raw: &FeatureVector) -> Result<FeatureVector, InferenceError> {
        if let Some(names) = self.feature_names() {
            if names.iter().map(String::as_str).ne(FEATURE_LAYOUT.iter().copied()) {
                return Err(InferenceError::FeatureMismatch(names.join(",")));
            }
        }

        let mut out = [0.0f64; FEATURE_COUNT];
        match self {
            ScalerParams::Standard { mean, scale, .. } => {
                check_len("scaler", mean.len())?;
                check_len("scaler", scale.len())?;
                for (i, x) in raw.values.iter().enumerate() {
                    // zero variance columns are left unscaled
                    let s = if scale[i] == 0.0 { 1.0 } else { scale[i] };
                    out[i] = (x - mean[i]) / s;
                }
            }
            ScalerParams::MinMax { min_vals, max_vals, .. } => {
                check_len("scaler", min_vals.len())?;
                check_len("scaler", max_vals.len())?;
                for (i, x) in raw.values.iter().enumerate() {
                    let range = (max_vals[i] - min_vals[i]).max(1e-8);
                    out[i] = (x - min_vals[i]) / range;
                }
            }
        }

        Ok(FeatureVector::from_values(out))
    }

    fn kind(&self) -> &'static str {
        match self {
            ScalerParams::Standard { .. } => "standard",
            ScalerParams::MinMax { .. } => "min_max",
        }
    }
}

pub(crate) fn check_len(artifact: &'static str, fitted: usize) -> Result<(), InferenceError> {
    if fitted != FEATURE_COUNT {
        return Err(InferenceError::ShapeMismatch {
            artifact,
            expected: fitted,
            actual: FEATURE_COUNT,
        });
    }
    Ok(())
}
