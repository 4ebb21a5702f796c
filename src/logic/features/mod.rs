//! Features Module - clinical input and column layout

pub mod patient;
pub mod vector;

// Re-export common types
pub use patient::PatientData;
pub use vector::{Feature, FeatureVector, FEATURE_COUNT, FEATURE_LAYOUT};
