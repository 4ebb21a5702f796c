//! Model Module - external collaborators behind traits
//!
//! Scaler and classifier are opaque artifacts produced by offline training.
//! Swapping a backend only touches this module.

pub mod artifacts;
pub mod classifier;
pub mod error;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod scaler;
#[cfg(test)]
pub(crate) mod stub;

// Re-export common types
pub use artifacts::{ArtifactInfo, ModelContext};
pub use classifier::{LinearClassifier, RiskModel};
pub use error::{ArtifactError, InferenceError};
pub use scaler::{Scaler, ScalerParams};
