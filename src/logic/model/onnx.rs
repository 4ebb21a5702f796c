//! ONNX Runtime classifier backend
//!
//! Loads a classifier exported to ONNX. The first output is the label and
//! `probabilities` holds per-class scores. Only a plain tensor is read for
//! probabilities: skl2onnx wraps them in a ZipMap (sequence of maps) unless
//! exported with `zipmap=False`, and such a model is scored through its label.

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::{Value, ValueType};
use parking_lot::Mutex;

use crate::logic::features::{FeatureVector, FEATURE_COUNT};
use super::classifier::RiskModel;
use super::error::{ArtifactError, InferenceError};

/// Name skl2onnx gives the class probability output
const PROBABILITY_OUTPUT: &str = "probabilities";

pub struct OnnxClassifier {
    // Session::run needs exclusive access
    session: Mutex<Session>,
    label_output: String,
    proba_output: Option<String>,
}

impl OnnxClassifier {
    /// Load ONNX model from bytes
    pub fn from_bytes(model_bytes: &[u8]) -> Result<Self, ArtifactError> {
        tracing::info!("Loading ONNX model from memory ({} bytes)", model_bytes.len());

        let session = Session::builder()
            .map_err(|e| ArtifactError::Onnx(format!("Session builder error: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ArtifactError::Onnx(format!("Optimization error: {}", e)))?
            .commit_from_memory(model_bytes)
            .map_err(|e| ArtifactError::Onnx(format!("Load from memory error: {}", e)))?;

        let outputs: Vec<(String, bool)> = session
            .outputs
            .iter()
            .map(|o| (o.name.clone(), matches!(o.output_type, ValueType::Tensor { .. })))
            .collect();
        let label_output = outputs
            .first()
            .map(|(name, _)| name.clone())
            .ok_or_else(|| ArtifactError::Onnx("No output defined".to_string()))?;
        let proba_output = probability_output(&outputs);
        if proba_output.is_none() && outputs.len() > 1 {
            tracing::warn!("ONNX probability output is not a tensor (ZipMap?), using label output");
        }

        tracing::info!(
            "ONNX model ready (label output: {}, probability output: {:?})",
            label_output,
            proba_output
        );

        Ok(Self {
            session: Mutex::new(session),
            label_output,
            proba_output,
        })
    }

    fn input_tensor(scaled: &FeatureVector) -> Result<Value, InferenceError> {
        let data: Vec<f32> = scaled.as_slice().iter().map(|v| *v as f32).collect();
        let array = Array2::<f32>::from_shape_vec((1, FEATURE_COUNT), data)
            .map_err(|e| InferenceError::Backend(format!("Array error: {}", e)))?;
        let tensor = Value::from_array(array)
            .map_err(|e| InferenceError::Backend(format!("Tensor error: {}", e)))?;
        Ok(tensor.into_dyn())
    }
}

/// Pick the probability output among `(name, is_tensor)` pairs
fn probability_output(outputs: &[(String, bool)]) -> Option<String> {
    let candidate = outputs
        .iter()
        .find(|(name, _)| name == PROBABILITY_OUTPUT)
        .or_else(|| outputs.get(1))?;
    candidate.1.then(|| candidate.0.clone())
}

impl RiskModel for OnnxClassifier {
    fn predict_proba(&self, scaled: &FeatureVector) -> Result<f64, InferenceError> {
        let output_name = self
            .proba_output
            .as_ref()
            .ok_or_else(|| InferenceError::InvalidOutput("model has no probability output".to_string()))?;

        let input = Self::input_tensor(scaled)?;
        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input])
            .map_err(|e| InferenceError::Backend(format!("Inference failed: {}", e)))?;

        let output = outputs
            .get(output_name)
            .ok_or_else(|| InferenceError::InvalidOutput(format!("missing output {}", output_name)))?;
        let (_, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError::InvalidOutput(format!("Extract error: {}", e)))?;

        // [1, 2] -> positive class column; [1, 1] -> already positive score
        let positive = match data.len() {
            0 => return Err(InferenceError::InvalidOutput("empty probability tensor".to_string())),
            1 => data[0],
            _ => data[1],
        };
        Ok(f64::from(positive))
    }

    fn predict_label(&self, scaled: &FeatureVector) -> Result<u8, InferenceError> {
        let input = Self::input_tensor(scaled)?;
        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input])
            .map_err(|e| InferenceError::Backend(format!("Inference failed: {}", e)))?;

        let output = outputs
            .get(&self.label_output)
            .ok_or_else(|| InferenceError::InvalidOutput(format!("missing output {}", self.label_output)))?;
        let (_, data) = output
            .try_extract_tensor::<i64>()
            .map_err(|e| InferenceError::InvalidOutput(format!("Extract error: {}", e)))?;

        data.first()
            .map(|label| u8::from(*label == 1))
            .ok_or_else(|| InferenceError::InvalidOutput("empty label tensor".to_string()))
    }

    fn supports_proba(&self) -> bool {
        self.proba_output.is_some()
    }

    fn kind(&self) -> &'static str {
        "onnx"
    }
}
