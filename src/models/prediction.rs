//! Prediction response model

use serde::{Deserialize, Serialize};

use crate::logic::risk::{AlertLevel, RiskAssessment, RiskThresholds};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaInfo {
    pub rango_prediabetes: String,
    pub umbral_diabetes: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub resultado_diagnostico: String,
    pub probabilidad_calculada: f64,
    pub nivel_alerta: AlertLevel,
    pub mensaje_clinico: String,
    pub factores_de_riesgo: Vec<String>,
    pub meta_info: MetaInfo,
}

impl PredictResponse {
    pub fn from_assessment(assessment: RiskAssessment, thresholds: &RiskThresholds) -> Self {
        Self {
            resultado_diagnostico: assessment.tier.label().to_string(),
            probabilidad_calculada: round4(assessment.probability),
            nivel_alerta: assessment.tier.alert_level(),
            mensaje_clinico: assessment.tier.clinical_message().to_string(),
            factores_de_riesgo: assessment.factors,
            meta_info: MetaInfo {
                rango_prediabetes: thresholds.prediabetes_range(),
                umbral_diabetes: thresholds.diabetes(),
            },
        }
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
