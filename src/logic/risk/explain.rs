//! Explanation Generator
//!
//! Restates which raw measurements fall in clinically notable bands.
//! Runs on the unscaled vector and never looks at the model output, so it can
//! report no factors for a high probability and vice versa.

use serde::{Deserialize, Serialize};

use crate::logic::features::{Feature, FeatureVector};
use super::policy::PolicyError;

/// Emitted when no band matches on any rule
pub const NO_RISK_FACTORS: &str = "no critical individual risk factors detected";

/// One threshold with its label, lower bound inclusive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub threshold: f64,
    pub label: String,
}

impl Band {
    fn new(threshold: f64, label: &str) -> Self {
        Self {
            threshold,
            label: label.to_string(),
        }
    }
}

/// Two-level check on a single feature; high band wins over mid band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandRule {
    pub feature: Feature,
    pub label: String,
    #[serde(default)]
    pub unit: String,
    pub high: Band,
    pub mid: Band,
}

impl BandRule {
    /// Statement for the highest matching band, if any
    pub fn evaluate(&self, raw: &FeatureVector) -> Option<String> {
        let value = raw.get(self.feature);
        let shown = self.format_value(value);

        if value >= self.high.threshold {
            Some(format!(
                "{} {} ({}{}) - >= {}{}",
                self.label, self.high.label, shown, self.unit, self.high.threshold, self.unit
            ))
        } else if value >= self.mid.threshold {
            Some(format!(
                "{} {} ({}{}) - {}{} to {}{}",
                self.label,
                self.mid.label,
                shown,
                self.unit,
                self.mid.threshold,
                self.unit,
                self.high.threshold,
                self.unit
            ))
        } else {
            None
        }
    }

    fn format_value(&self, value: f64) -> String {
        if self.feature.is_integer() {
            format!("{:.0}", value)
        } else {
            format!("{:.1}", value)
        }
    }
}

/// Ordered rule table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExplanationRules {
    rules: Vec<BandRule>,
}

impl Default for ExplanationRules {
    fn default() -> Self {
        Self {
            rules: vec![
                BandRule {
                    feature: Feature::Hba1c,
                    label: "HbA1c".to_string(),
                    unit: "%".to_string(),
                    high: Band::new(6.5, "critical"),
                    mid: Band::new(5.7, "elevated"),
                },
                BandRule {
                    feature: Feature::GlucoseFasting,
                    label: "Glucose ayunas".to_string(),
                    unit: " mg/dL".to_string(),
                    high: Band::new(126.0, "alta"),
                    mid: Band::new(100.0, "alterada"),
                },
                BandRule {
                    feature: Feature::Bmi,
                    label: "BMI".to_string(),
                    unit: " kg/m2".to_string(),
                    high: Band::new(30.0, "obesity"),
                    mid: Band::new(25.0, "overweight"),
                },
            ],
        }
    }
}

impl ExplanationRules {
    /// Parse a JSON rule table and check band ordering
    pub fn from_json(json: &str) -> Result<Self, RulesError> {
        let table: Self = serde_json::from_str(json)?;
        table.validate()?;
        Ok(table)
    }

    pub fn validate(&self) -> Result<(), PolicyError> {
        for rule in &self.rules {
            let ordered = rule.mid.threshold.is_finite()
                && rule.high.threshold.is_finite()
                && rule.mid.threshold < rule.high.threshold;
            if !ordered {
                return Err(PolicyError::InvalidBand {
                    feature: rule.feature.name().to_string(),
                    mid: rule.mid.threshold,
                    high: rule.high.threshold,
                });
            }
        }
        Ok(())
    }

    pub fn rules(&self) -> &[BandRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Factor statements in rule order, or the single fallback statement
    pub fn explain(&self, raw: &FeatureVector) -> Vec<String> {
        let factors: Vec<String> = self.rules.iter().filter_map(|r| r.evaluate(raw)).collect();
        if factors.is_empty() {
            vec![NO_RISK_FACTORS.to_string()]
        } else {
            factors
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    #[error("invalid rule file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Policy(#[from] PolicyError),
}
