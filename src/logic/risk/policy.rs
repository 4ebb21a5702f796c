//! Risk Classification Policy
//!
//! Maps a model probability to one of three ordered tiers. Intervals are
//! closed-open: a probability exactly on a cut point belongs to the higher tier.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// THRESHOLDS (model-version dependent)
// ============================================================================

/// At or above this probability = Prediabetes
pub const PREDIABETES_THRESHOLD: f64 = 0.30;

/// At or above this probability = Diabetes
pub const DIABETES_THRESHOLD: f64 = 0.4798;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolicyError {
    #[error("thresholds must be finite and satisfy 0 <= prediabetes < diabetes <= 1 (got {prediabetes}, {diabetes})")]
    InvalidThresholds { prediabetes: f64, diabetes: f64 },

    #[error("rule for {feature}: mid band ({mid}) must be below high band ({high})")]
    InvalidBand { feature: String, mid: f64, high: f64 },
}

/// Cut points between tiers
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskThresholds {
    prediabetes: f64,
    diabetes: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            prediabetes: PREDIABETES_THRESHOLD,
            diabetes: DIABETES_THRESHOLD,
        }
    }
}

impl RiskThresholds {
    pub fn new(prediabetes: f64, diabetes: f64) -> Result<Self, PolicyError> {
        let valid = prediabetes.is_finite()
            && diabetes.is_finite()
            && prediabetes >= 0.0
            && diabetes <= 1.0
            && prediabetes < diabetes;
        if !valid {
            return Err(PolicyError::InvalidThresholds { prediabetes, diabetes });
        }
        Ok(Self { prediabetes, diabetes })
    }

    pub fn prediabetes(&self) -> f64 {
        self.prediabetes
    }

    pub fn diabetes(&self) -> f64 {
        self.diabetes
    }

    pub fn classify(&self, probability: f64) -> RiskTier {
        if probability >= self.diabetes {
            RiskTier::Diabetes
        } else if probability >= self.prediabetes {
            RiskTier::Prediabetes
        } else {
            RiskTier::Healthy
        }
    }

    /// Human-readable prediabetes band, e.g. "0.30 - 0.4798"
    pub fn prediabetes_range(&self) -> String {
        format!("{:.2} - {:.4}", self.prediabetes, self.diabetes)
    }
}

// ============================================================================
// TIERS
// ============================================================================

/// Risk tiers, ordered from lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskTier {
    Healthy,
    Prediabetes,
    Diabetes,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Healthy => "healthy",
            RiskTier::Prediabetes => "prediabetes",
            RiskTier::Diabetes => "diabetes",
        }
    }

    /// Diagnostic label returned to clients
    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::Healthy => "Negativo (Sano)",
            RiskTier::Prediabetes => "Alerta: Prediabetes / Riesgo Elevado",
            RiskTier::Diabetes => "Positivo (Diabetes Tipo 2)",
        }
    }

    pub fn alert_level(&self) -> AlertLevel {
        match self {
            RiskTier::Healthy => AlertLevel::Low,
            RiskTier::Prediabetes => AlertLevel::Medium,
            RiskTier::Diabetes => AlertLevel::High,
        }
    }

    pub fn clinical_message(&self) -> &'static str {
        match self {
            RiskTier::Healthy => {
                "No se detectan indicadores significativos de diabetes. Mantenga hábitos saludables y controles periódicos."
            }
            RiskTier::Prediabetes => {
                "Riesgo elevado de desarrollar diabetes. Se recomiendan cambios en el estilo de vida y seguimiento médico."
            }
            RiskTier::Diabetes => {
                "Alta probabilidad de Diabetes Tipo 2. Se recomienda confirmación diagnóstica y consulta con un especialista."
            }
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Alert level attached to each tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertLevel {
    #[serde(rename = "BAJA")]
    Low,
    #[serde(rename = "MEDIA")]
    Medium,
    #[serde(rename = "ALTA")]
    High,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Low => "BAJA",
            AlertLevel::Medium => "MEDIA",
            AlertLevel::High => "ALTA",
        }
    }
}
