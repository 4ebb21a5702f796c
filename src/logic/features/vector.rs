//! Feature Vector - Core data structure for model input
//!
//! Uses the fixed column layout the classifier and scaler were trained on.
//! Never reorder `FEATURE_LAYOUT` without retraining both artifacts.

use serde::{Deserialize, Serialize};

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in exact column order
pub const FEATURE_LAYOUT: &[&str] = &[
    "hba1c",                              // 0: Glycated hemoglobin (%)
    "glucose_postprandial",               // 1: Glucose 2h after a meal (mg/dL)
    "glucose_fasting",                    // 2: Fasting glucose (mg/dL)
    "age",                                // 3: Years
    "bmi",                                // 4: Body mass index (kg/m2)
    "systolic_bp",                        // 5: Systolic blood pressure (mm Hg)
    "cholesterol_total",                  // 6: Total cholesterol (mg/dL)
    "physical_activity_minutes_per_week", // 7: Exercise minutes per week
];

/// Total number of features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 8;

/// Named column of the feature vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Hba1c,
    GlucosePostprandial,
    GlucoseFasting,
    Age,
    Bmi,
    SystolicBp,
    CholesterolTotal,
    PhysicalActivityMinutesPerWeek,
}

impl Feature {
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::Hba1c,
        Feature::GlucosePostprandial,
        Feature::GlucoseFasting,
        Feature::Age,
        Feature::Bmi,
        Feature::SystolicBp,
        Feature::CholesterolTotal,
        Feature::PhysicalActivityMinutesPerWeek,
    ];

    /// Column index in the vector
    pub fn index(&self) -> usize {
        match self {
            Feature::Hba1c => 0,
            Feature::GlucosePostprandial => 1,
            Feature::GlucoseFasting => 2,
            Feature::Age => 3,
            Feature::Bmi => 4,
            Feature::SystolicBp => 5,
            Feature::CholesterolTotal => 6,
            Feature::PhysicalActivityMinutesPerWeek => 7,
        }
    }

    pub fn name(&self) -> &'static str {
        FEATURE_LAYOUT[self.index()]
    }

    /// Integer-valued measurement (everything except hba1c and bmi)
    pub fn is_integer(&self) -> bool {
        !matches!(self, Feature::Hba1c | Feature::Bmi)
    }

    pub fn from_name(name: &str) -> Option<Feature> {
        Feature::ALL.iter().copied().find(|f| f.name() == name)
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// FEATURE VECTOR
// ============================================================================

/// Ordered 8-column measurement tuple, raw or scaled
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    pub fn get(&self, feature: Feature) -> f64 {
        self.values[feature.index()]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Named values for structured logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        let named: serde_json::Map<String, serde_json::Value> = Feature::ALL
            .iter()
            .map(|f| (f.name().to_string(), serde_json::json!(self.get(*f))))
            .collect();
        serde_json::Value::Object(named)
    }
}
