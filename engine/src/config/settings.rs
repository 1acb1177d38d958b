// Engine settings, loaded from a JSON file or taken from the defaults below.
use crate::analysis::bid::BidPolicy;
use crate::analysis::opportunity::OpportunityRule;
use crate::error::EngineError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming a settings file when `--config` is not given.
pub const CONFIG_ENV_VAR: &str = "ADSCOPE_CONFIG";

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
    /// Target ACOS (percentage points) every freshly ingested bid row starts with.
    pub default_target_acos: f64,
    pub bid_policy: BidPolicy,
    pub opportunity: OpportunityRule,
    /// Zero-based row holding the column labels in PPC exports.
    pub ppc_header_row: usize,
    /// Brand share exports carry a banner line above the labels.
    pub brand_header_row: usize,
    pub export_dir: PathBuf,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            default_target_acos: 30.0,
            bid_policy: BidPolicy::default(),
            opportunity: OpportunityRule::default(),
            ppc_header_row: 0,
            brand_header_row: 1,
            export_dir: PathBuf::from("."),
        }
    }
}

impl EngineSettings {
    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        let settings: EngineSettings = serde_json::from_str(json)
            .map_err(|e| EngineError::ConfigError(format!("Invalid settings JSON: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, EngineError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            EngineError::ConfigError(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    /// Explicit path first, then `ADSCOPE_CONFIG`, then defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, EngineError> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(env_path) => Self::from_file(Path::new(&env_path)),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<(), EngineError> {
        let numbers = [
            ("default_target_acos", self.default_target_acos),
            ("bid_policy.raise_threshold", self.bid_policy.raise_threshold),
            ("bid_policy.raise_multiplier", self.bid_policy.raise_multiplier),
            ("opportunity.impression_ceiling", self.opportunity.impression_ceiling),
        ];
        for (name, value) in numbers {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::ConfigError(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let settings = EngineSettings::default();
        assert_eq!(settings.default_target_acos, 30.0);
        assert_eq!(settings.bid_policy.raise_threshold, 0.84);
        assert_eq!(settings.bid_policy.raise_multiplier, 1.2);
        assert_eq!(settings.opportunity.impression_ceiling, 0.8);
        assert_eq!(settings.brand_header_row, 1);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings =
            EngineSettings::from_json_str(r#"{ "default_target_acos": 25.0, "bid_policy": { "raise_multiplier": 1.1 } }"#)
                .unwrap();
        assert_eq!(settings.default_target_acos, 25.0);
        assert_eq!(settings.bid_policy.raise_multiplier, 1.1);
        assert_eq!(settings.bid_policy.raise_threshold, 0.84);
        assert_eq!(settings.ppc_header_row, 0);
    }

    #[test]
    fn test_negative_value_rejected() {
        let result = EngineSettings::from_json_str(r#"{ "default_target_acos": -1 }"#);
        assert!(matches!(result, Err(EngineError::ConfigError(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{ "brand_header_row": 0, "export_dir": "out" }}"#).unwrap();
        let settings = EngineSettings::load(Some(file.path())).unwrap();
        assert_eq!(settings.brand_header_row, 0);
        assert_eq!(settings.export_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = EngineSettings::from_file(Path::new("does/not/exist.json"));
        assert!(matches!(result, Err(EngineError::ConfigError(_))));
    }
}
