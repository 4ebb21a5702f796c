use std::path::PathBuf;

use thiserror::Error;

/// Failure while running a loaded artifact on a structurally valid vector
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("{artifact} expects {expected} features, got {actual}")]
    ShapeMismatch {
        artifact: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("feature names do not match layout: {0}")]
    FeatureMismatch(String),

    #[error("invalid model output: {0}")]
    InvalidOutput(String),

    #[error("inference backend error: {0}")]
    Backend(String),
}

/// Failure while loading an artifact file at startup
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported artifact: {0}")]
    Unsupported(String),

    #[error("onnx runtime error: {0}")]
    Onnx(String),
}
