//! Model Artifacts - load-once, read-only classifier and scaler
//!
//! Loaded synchronously before the server accepts traffic. A failed load
//! leaves the artifact absent and the service in degraded mode.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::classifier::{LinearClassifier, RiskModel};
use super::error::ArtifactError;
use super::scaler::{Scaler, ScalerParams};

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Metadata recorded for each loaded artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactInfo {
    pub path: String,
    pub kind: String,
    pub sha256: String,
    pub size_bytes: u64,
    pub loaded_at: DateTime<Utc>,
}

impl ArtifactInfo {
    fn new(path: &Path, kind: &str, bytes: &[u8]) -> Self {
        Self {
            path: path.display().to_string(),
            kind: kind.to_string(),
            sha256: sha256_hex(bytes),
            size_bytes: bytes.len() as u64,
            loaded_at: Utc::now(),
        }
    }
}

/// Process-wide artifact pair, shared read-only by all requests
#[derive(Clone, Default)]
pub struct ModelContext {
    scaler: Option<Arc<dyn Scaler>>,
    model: Option<Arc<dyn RiskModel>>,
    scaler_info: Option<ArtifactInfo>,
    model_info: Option<ArtifactInfo>,
    supports_proba: bool,
}

impl std::fmt::Debug for ModelContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelContext")
            .field("scaler_ready", &self.scaler_ready())
            .field("model_ready", &self.model_ready())
            .field("supports_proba", &self.supports_proba)
            .finish()
    }
}

impl ModelContext {
    /// Load both artifacts from disk. Never fails: errors are logged and
    /// the corresponding artifact stays absent.
    pub fn load(model_path: &Path, scaler_path: &Path) -> Self {
        let mut ctx = Self::default();

        match load_scaler(scaler_path) {
            Ok((scaler, info)) => {
                tracing::info!("Scaler loaded: {} ({}, sha256 {})", info.path, info.kind, info.sha256);
                ctx.scaler = Some(scaler);
                ctx.scaler_info = Some(info);
            }
            Err(e) => tracing::error!("Scaler unavailable: {}", e),
        }

        match load_classifier(model_path) {
            Ok((model, info)) => {
                tracing::info!("Model loaded: {} ({}, sha256 {})", info.path, info.kind, info.sha256);
                ctx.supports_proba = model.supports_proba();
                if !ctx.supports_proba {
                    tracing::warn!("Model has no probability output, predicted label will be used");
                }
                ctx.model = Some(model);
                ctx.model_info = Some(info);
            }
            Err(e) => tracing::error!("Model unavailable: {}", e),
        }

        if !ctx.is_ready() {
            tracing::warn!("Starting in degraded mode: /predict will answer 503");
        }

        ctx
    }

    /// Build from already constructed artifacts
    pub fn from_parts(scaler: Option<Arc<dyn Scaler>>, model: Option<Arc<dyn RiskModel>>) -> Self {
        let supports_proba = model.as_ref().map(|m| m.supports_proba()).unwrap_or(false);
        Self {
            scaler,
            model,
            scaler_info: None,
            model_info: None,
            supports_proba,
        }
    }

    pub fn scaler_ready(&self) -> bool {
        self.scaler.is_some()
    }

    pub fn model_ready(&self) -> bool {
        self.model.is_some()
    }

    pub fn is_ready(&self) -> bool {
        self.scaler_ready() && self.model_ready()
    }

    /// Probability capability, checked once at load time
    pub fn supports_proba(&self) -> bool {
        self.supports_proba
    }

    /// Both artifacts, or None in degraded mode
    pub fn artifacts(&self) -> Option<(&dyn Scaler, &dyn RiskModel)> {
        match (&self.scaler, &self.model) {
            (Some(scaler), Some(model)) => Some((scaler.as_ref(), model.as_ref())),
            _ => None,
        }
    }

    pub fn scaler_info(&self) -> Option<&ArtifactInfo> {
        self.scaler_info.as_ref()
    }

    pub fn model_info(&self) -> Option<&ArtifactInfo> {
        self.model_info.as_ref()
    }
}

// ============================================================================
// LOADERS
// ============================================================================

fn read_artifact(path: &Path) -> Result<Vec<u8>, ArtifactError> {
    if !path.exists() {
        return Err(ArtifactError::NotFound(path.to_path_buf()));
    }
    std::fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load scaler parameters (JSON)
pub fn load_scaler(path: &Path) -> Result<(Arc<dyn Scaler>, ArtifactInfo), ArtifactError> {
    let bytes = read_artifact(path)?;
    let params: ScalerParams = serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Parse {
        path: PathBuf::from(path),
        source,
    })?;
    let info = ArtifactInfo::new(path, params.kind(), &bytes);
    Ok((Arc::new(params), info))
}

/// Load classifier, format chosen by file extension (.onnx or JSON)
pub fn load_classifier(path: &Path) -> Result<(Arc<dyn RiskModel>, ArtifactInfo), ArtifactError> {
    let bytes = read_artifact(path)?;

    if path.extension().and_then(|e| e.to_str()) == Some("onnx") {
        return load_onnx(path, &bytes);
    }

    let model: LinearClassifier = serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Parse {
        path: PathBuf::from(path),
        source,
    })?;
    let info = ArtifactInfo::new(path, model.kind(), &bytes);
    Ok((Arc::new(model), info))
}

#[cfg(feature = "onnx")]
fn load_onnx(path: &Path, bytes: &[u8]) -> Result<(Arc<dyn RiskModel>, ArtifactInfo), ArtifactError> {
    let model = super::onnx::OnnxClassifier::from_bytes(bytes)?;
    let info = ArtifactInfo::new(path, model.kind(), bytes);
    Ok((Arc::new(model), info))
}

#[cfg(not(feature = "onnx"))]
fn load_onnx(path: &Path, _bytes: &[u8]) -> Result<(Arc<dyn RiskModel>, ArtifactInfo), ArtifactError> {
    Err(ArtifactError::Unsupported(format!(
        "{} is an ONNX model but the `onnx` feature is not enabled",
        path.display()
    )))
}

/// Hex SHA-256 fingerprint of artifact bytes
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SCALER_JSON: &str = r#"{"kind": "standard", "mean": [0,0,0,0,0,0,0,0], "scale": [1,1,1,1,1,1,1,1]}"#;
    const MODEL_JSON: &str = r#"{"kind": "logistic_regression", "coefficients": [0,0,0,0,0,0,0,0], "intercept": 0.0}"#;

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_both_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let scaler = write_file(&dir, "scaler.json", SCALER_JSON);
        let model = write_file(&dir, "model.json", MODEL_JSON);

        let ctx = ModelContext::load(&model, &scaler);
        assert!(ctx.is_ready());
        assert!(ctx.supports_proba());
        assert!(ctx.artifacts().is_some());

        let info = ctx.model_info().unwrap();
        assert_eq!(info.kind, "logistic_regression");
        assert_eq!(info.sha256, sha256_hex(MODEL_JSON.as_bytes()));
        assert_eq!(info.size_bytes, MODEL_JSON.len() as u64);
        assert_eq!(ctx.scaler_info().unwrap().kind, "standard");
    }

    #[test]
    fn test_missing_model_is_degraded() {
        let dir = tempfile::tempdir().unwrap();
        let scaler = write_file(&dir, "scaler.json", SCALER_JSON);

        let ctx = ModelContext::load(&dir.path().join("missing.json"), &scaler);
        assert!(ctx.scaler_ready());
        assert!(!ctx.model_ready());
        assert!(!ctx.is_ready());
        assert!(ctx.artifacts().is_none());
    }

    #[test]
    fn test_corrupt_scaler_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "scaler.json", "{not json");
        let err = load_scaler(&path).err().unwrap();
        assert!(matches!(err, ArtifactError::Parse { .. }));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_classifier(&dir.path().join("model.json")).err().unwrap();
        assert!(matches!(err, ArtifactError::NotFound(_)));
    }

    #[test]
    fn test_decision_model_records_no_proba() {
        let dir = tempfile::tempdir().unwrap();
        let scaler = write_file(&dir, "scaler.json", SCALER_JSON);
        let model = write_file(
            &dir,
            "model.json",
            r#"{"kind": "linear_decision", "coefficients": [0,0,0,0,0,0,0,0], "intercept": 1.0}"#,
        );
        let ctx = ModelContext::load(&model, &scaler);
        assert!(ctx.is_ready());
        assert!(!ctx.supports_proba());
    }

    #[cfg(not(feature = "onnx"))]
    #[test]
    fn test_onnx_without_feature_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "model.onnx", "binary");
        let err = load_classifier(&path).err().unwrap();
        assert!(matches!(err, ArtifactError::Unsupported(_)));
    }

    #[test]
    fn test_sha256_known_value() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
