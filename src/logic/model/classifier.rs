//! Risk Model - binary classifier over the scaled feature vector

use serde::{Deserialize, Serialize};

use crate::logic::features::FeatureVector;
use super::error::InferenceError;
use super::scaler::check_len;

/// Trait for classifier backends (JSON linear models, ONNX, test stubs)
pub trait RiskModel: Send + Sync {
    /// Probability of the positive class (diabetes) in [0, 1]
    fn predict_proba(&self, scaled: &FeatureVector) -> Result<f64, InferenceError>;

    /// Hard label, 1 = positive
    fn predict_label(&self, scaled: &FeatureVector) -> Result<u8, InferenceError>;

    /// Whether `predict_proba` is backed by a real probability output
    fn supports_proba(&self) -> bool;

    fn kind(&self) -> &'static str;
}

// ============================================================================
// JSON ARTIFACT
// ============================================================================

/// Linear classifier exported from training
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LinearClassifier {
    /// sigmoid(w·x + b)
    LogisticRegression { coefficients: Vec<f64>, intercept: f64 },
    /// Sign of w·x + b, no probability output
    LinearDecision { coefficients: Vec<f64>, intercept: f64 },
}

impl LinearClassifier {
    fn decision(&self, scaled: &FeatureVector) -> Result<f64, InferenceError> {
        let (coefficients, intercept) = match self {
            LinearClassifier::LogisticRegression { coefficients, intercept }
            | LinearClassifier::LinearDecision { coefficients, intercept } => (coefficients, *intercept),
        };
        check_len("classifier", coefficients.len())?;

        let dot: f64 = coefficients
            .iter()
            .zip(scaled.as_slice())
            .map(|(w, x)| w * x)
            .sum();
        Ok(dot + intercept)
    }
}

impl RiskModel for LinearClassifier {
    fn predict_proba(&self, scaled: &FeatureVector) -> Result<f64, InferenceError> {
        match self {
            LinearClassifier::LogisticRegression { .. } => {
                let z = self.decision(scaled)?;
                Ok(1.0 / (1.0 + (-z).exp()))
            }
            LinearClassifier::LinearDecision { .. } => Err(InferenceError::InvalidOutput(
                "linear_decision has no probability output".to_string(),
            )),
        }
    }

    fn predict_label(&self, scaled: &FeatureVector) -> Result<u8, InferenceError> {
        let z = self.decision(scaled)?;
        Ok(u8::from(z >= 0.0))
    }

    fn supports_proba(&self) -> bool {
        matches!(self, LinearClassifier::LogisticRegression { .. })
    }

    fn kind(&self) -> &'static str {
        match self {
            LinearClassifier::LogisticRegression { .. } => "logistic_regression",
            LinearClassifier::LinearDecision { .. } => "linear_decision",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::FEATURE_COUNT;

    fn zeros() -> FeatureVector {
        FeatureVector::from_values([0.0; FEATURE_COUNT])
    }

    #[test]
    fn test_logistic_intercept_only() {
        let model = LinearClassifier::LogisticRegression {
            coefficients: vec![0.0; FEATURE_COUNT],
            intercept: 0.0,
        };
        assert!(model.supports_proba());
        assert!((model.predict_proba(&zeros()).unwrap() - 0.5).abs() < 1e-12);
        assert_eq!(model.predict_label(&zeros()).unwrap(), 1);
    }

    #[test]
    fn test_logistic_uses_coefficients() {
        let mut coefficients = vec![0.0; FEATURE_COUNT];
        coefficients[0] = 2.0;
        let model = LinearClassifier::LogisticRegression { coefficients, intercept: -1.0 };
        let mut values = [0.0; FEATURE_COUNT];
        values[0] = 1.5;
        let p = model.predict_proba(&FeatureVector::from_values(values)).unwrap();
        // z = 2.0 * 1.5 - 1.0 = 2.0
        assert!((p - 1.0 / (1.0 + (-2.0f64).exp())).abs() < 1e-12);
    }

    #[test]
    fn test_decision_model_has_no_proba() {
        let model = LinearClassifier::LinearDecision {
            coefficients: vec![0.0; FEATURE_COUNT],
            intercept: -0.5,
        };
        assert!(!model.supports_proba());
        assert!(model.predict_proba(&zeros()).is_err());
        assert_eq!(model.predict_label(&zeros()).unwrap(), 0);
    }

    #[test]
    fn test_coefficient_count_mismatch() {
        let model = LinearClassifier::LogisticRegression {
            coefficients: vec![1.0; 5],
            intercept: 0.0,
        };
        assert!(matches!(
            model.predict_proba(&zeros()),
            Err(InferenceError::ShapeMismatch { expected: 5, .. })
        ));
    }

    #[test]
    fn test_parse_from_json() {
        let json = r#"{"kind": "linear_decision", "coefficients": [1,1,1,1,1,1,1,1], "intercept": 0.0}"#;
        let model: LinearClassifier = serde_json::from_str(json).unwrap();
        assert_eq!(model.kind(), "linear_decision");
    }
}
