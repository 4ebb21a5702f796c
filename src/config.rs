//! Configuration module

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

use crate::logic::risk::{
    ExplanationRules, PolicyError, RiskThresholds, RulesError,
    policy::{DIABETES_THRESHOLD, PREDIABETES_THRESHOLD},
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error("failed to read rules file {}: {source}", path.display())]
    RulesFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("rules file {}: {source}", path.display())]
    Rules {
        path: PathBuf,
        #[source]
        source: RulesError,
    },
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address
    pub host: IpAddr,

    /// Server port
    pub port: u16,

    /// Classifier artifact (.json or .onnx)
    pub model_path: PathBuf,

    /// Scaler artifact (.json)
    pub scaler_path: PathBuf,

    /// Tier cut points
    pub thresholds: RiskThresholds,

    /// Explanation rule table
    pub rules: ExplanationRules,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = parse_or(&lookup, "HOST", IpAddr::from([0, 0, 0, 0]))?;
        let port = parse_or(&lookup, "PORT", 8000u16)?;

        let prediabetes = parse_or(&lookup, "RISK_THRESHOLD_PREDIABETES", PREDIABETES_THRESHOLD)?;
        let diabetes = parse_or(&lookup, "RISK_THRESHOLD_DIABETES", DIABETES_THRESHOLD)?;
        let thresholds = RiskThresholds::new(prediabetes, diabetes)?;

        let rules = match lookup("EXPLANATION_RULES_PATH").filter(|p| !p.is_empty()) {
            Some(path) => load_rules(PathBuf::from(path))?,
            None => ExplanationRules::default(),
        };

        Ok(Self {
            host,
            port,
            model_path: lookup("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("artifacts/model.json")),
            scaler_path: lookup("SCALER_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("artifacts/scaler.json")),
            thresholds,
            rules,
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        None => Ok(default),
    }
}

fn load_rules(path: PathBuf) -> Result<ExplanationRules, ConfigError> {
    let json = std::fs::read_to_string(&path).map_err(|source| ConfigError::RulesFile {
        path: path.clone(),
        source,
    })?;
    ExplanationRules::from_json(&json).map_err(|source| ConfigError::Rules { path, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = tokio_test::assert_ok!(Config::from_lookup(lookup_from(&[])));
        assert_eq!(config.port, 8000);
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8000");
        assert_eq!(config.model_path, PathBuf::from("artifacts/model.json"));
        assert_eq!(config.scaler_path, PathBuf::from("artifacts/scaler.json"));
        assert_eq!(config.thresholds, RiskThresholds::default());
        assert_eq!(config.rules, ExplanationRules::default());
        assert!(!config.is_production());
    }

    #[test]
    fn test_overrides() {
        let config = tokio_test::assert_ok!(Config::from_lookup(lookup_from(&[
            ("PORT", "9090"),
            ("HOST", "127.0.0.1"),
            ("MODEL_PATH", "/models/clf.onnx"),
            ("RISK_THRESHOLD_PREDIABETES", "0.25"),
            ("RISK_THRESHOLD_DIABETES", "0.5"),
            ("ENVIRONMENT", "production"),
        ])));
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:9090");
        assert_eq!(config.model_path, PathBuf::from("/models/clf.onnx"));
        assert_eq!(config.thresholds.prediabetes(), 0.25);
        assert_eq!(config.thresholds.diabetes(), 0.5);
        assert!(config.is_production());
    }

    #[test]
    fn test_unparseable_value() {
        let err = Config::from_lookup(lookup_from(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "PORT", .. }));
    }

    #[test]
    fn test_inverted_thresholds() {
        let err = Config::from_lookup(lookup_from(&[
            ("RISK_THRESHOLD_PREDIABETES", "0.6"),
            ("RISK_THRESHOLD_DIABETES", "0.4"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Policy(PolicyError::InvalidThresholds { .. })));
    }

    #[test]
    fn test_rules_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        std::fs::write(
            &path,
            r#"[{"feature": "hba1c", "label": "HbA1c", "unit": "%",
                 "high": {"threshold": 6.5, "label": "critical"},
                 "mid": {"threshold": 5.7, "label": "elevated"}}]"#,
        )
        .unwrap();

        let path_str = path.to_string_lossy().to_string();
        let config = Config::from_lookup(lookup_from(&[("EXPLANATION_RULES_PATH", path_str.as_str())])).unwrap();
        assert_eq!(config.rules.len(), 1);

        let missing = dir.path().join("missing.json").to_string_lossy().to_string();
        let err = Config::from_lookup(lookup_from(&[("EXPLANATION_RULES_PATH", missing.as_str())])).unwrap_err();
        assert!(matches!(err, ConfigError::RulesFile { .. }));
    }
}
