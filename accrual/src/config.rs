//! Engine configuration with TOML file support.

use serde::{Deserialize, Serialize};
use ubi_types::{AccrualParams, Address, PolicyId, Timestamp};
use ubi_utils::LogFormat;

use crate::AccrualError;

/// A policy installed when the engine is constructed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisPolicy {
    pub id: PolicyId,
    pub rate_per_second: u64,
    pub valid_from: Timestamp,
    pub valid_to: Timestamp,
}

/// Configuration for an accrual engine.
///
/// Can be loaded from a TOML file via [`AccrualConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AccrualConfig {
    /// The governor. Fixed for the lifetime of the engine.
    pub controller: Address,

    /// Whether anyone may start accrual on behalf of an eligible participant.
    /// When false, participants can only start their own accrual.
    #[serde(default)]
    pub allow_third_party_start: bool,

    /// Rate-policy defaults.
    #[serde(default)]
    pub params: AccrualParams,

    /// Policies created at construction time.
    #[serde(default)]
    pub policies: Vec<GenesisPolicy>,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AccrualConfig {
    pub fn new(controller: Address) -> Self {
        Self {
            controller,
            allow_third_party_start: false,
            params: AccrualParams::default(),
            policies: Vec::new(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<std::path::Path>) -> Result<Self, AccrualError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| AccrualError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, AccrualError> {
        toml::from_str(s).map_err(|e| AccrualError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, AccrualError> {
        toml::to_string_pretty(self).map_err(|e| AccrualError::Config(e.to_string()))
    }

    /// Install the global tracing subscriber using this config's log settings.
    pub fn init_logging(&self) -> bool {
        ubi_utils::init_logging(self.log_format, &self.log_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = AccrualConfig::from_toml_str(r#"controller = "ubi_gov""#).unwrap();
        assert_eq!(config.controller, Address::new("ubi_gov"));
        assert!(!config.allow_third_party_start);
        assert_eq!(config.params, AccrualParams::default());
        assert!(config.policies.is_empty());
        assert_eq!(config.log_format, LogFormat::Human);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn controller_is_required() {
        let err = AccrualConfig::from_toml_str("allow_third_party_start = true").unwrap_err();
        assert!(matches!(err, AccrualError::Config(_)));
    }

    #[test]
    fn malformed_controller_rejected() {
        let err = AccrualConfig::from_toml_str(r#"controller = "gov""#).unwrap_err();
        assert!(matches!(err, AccrualError::Config(_)));
    }

    #[test]
    fn full_toml_parses() {
        let toml = r#"
            controller = "ubi_gov"
            allow_third_party_start = true
            log_format = "json"
            log_level = "debug"

            [params]
            default_rate_per_second = 5

            [[policies]]
            id = 1
            rate_per_second = 10
            valid_from = 1000
            valid_to = 2000
        "#;
        let config = AccrualConfig::from_toml_str(toml).unwrap();
        assert!(config.allow_third_party_start);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.params.default_rate_per_second, 5);
        assert_eq!(
            config.params.default_policy_duration_secs,
            AccrualParams::default().default_policy_duration_secs
        );
        assert_eq!(config.policies.len(), 1);
        assert_eq!(config.policies[0].valid_to, Timestamp::new(2000));
    }

    #[test]
    fn config_round_trips_through_toml() {
        let mut config = AccrualConfig::new(Address::new("ubi_gov"));
        config.policies.push(GenesisPolicy {
            id: 4,
            rate_per_second: 3,
            valid_from: Timestamp::new(0),
            valid_to: Timestamp::new(60),
        });
        let parsed = AccrualConfig::from_toml_str(&config.to_toml_string().unwrap()).unwrap();
        assert_eq!(parsed.controller, config.controller);
        assert_eq!(parsed.policies, config.policies);
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"controller = "ubi_gov""#).unwrap();
        let config = AccrualConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.controller.as_str(), "ubi_gov");
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = AccrualConfig::from_toml_file("/nonexistent/ubi.toml");
        assert!(matches!(result, Err(AccrualError::Config(_))));
    }
}
