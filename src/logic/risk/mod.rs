//! Risk Module - classification policy, explanations and the pipeline
//!
//! Thresholds and rule tables are configuration, not inline literals, so
//! they can change with the model version and be tested without HTTP.

pub mod explain;
pub mod pipeline;
pub mod policy;


// Re-export common types
pub use explain::{Band, BandRule, ExplanationRules, RulesError, NO_RISK_FACTORS};
pub use pipeline::{assess, PipelineError, RiskAssessment};
pub use policy::{AlertLevel, PolicyError, RiskThresholds, RiskTier};

/// Active policy: tier cut points plus explanation rules
#[derive(Debug, Clone, Default)]
pub struct RiskPolicy {
    thresholds: RiskThresholds,
    rules: ExplanationRules,
}

impl RiskPolicy {
    pub fn new(thresholds: RiskThresholds, rules: ExplanationRules) -> Self {
        Self { thresholds, rules }
    }

    pub fn thresholds(&self) -> &RiskThresholds {
        &self.thresholds
    }

    pub fn rules(&self) -> &ExplanationRules {
        &self.rules
    }
}
