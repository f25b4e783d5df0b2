use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::JournalError;

fn default_risk_free_rate() -> f64 {
    0.02
}

fn default_currency() -> String {
    "INR".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalSettings {
    /// Account value supplied by the backend, used when the ledger is empty.
    #[serde(default)]
    pub account_value: Option<f64>,
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for JournalSettings {
    fn default() -> Self {
        Self {
            account_value: None,
            risk_free_rate: default_risk_free_rate(),
            currency: default_currency(),
        }
    }
}

impl JournalSettings {
    pub fn from_json_str(json: &str) -> Result<Self, JournalError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a JSON file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, JournalError> {
        if !path.exists() {
            log::info!("No settings file at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let settings = Self::from_json_str(&content)?;
        log::info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<(), JournalError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = JournalSettings::from_json_str(r#"{"account_value": 25000.0}"#).unwrap();
        assert_eq!(settings.account_value, Some(25000.0));
        assert_eq!(settings.risk_free_rate, 0.02);
        assert_eq!(settings.currency, "INR");
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = JournalSettings::load(&dir.path().join("settings.json")).unwrap();
        assert_eq!(settings, JournalSettings::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = JournalSettings {
            account_value: Some(1000.0),
            risk_free_rate: 0.0,
            currency: "USD".to_string(),
        };
        settings.save(&path).unwrap();
        assert_eq!(JournalSettings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(JournalSettings::load(&path), Err(JournalError::ParseError(_))));
    }
}
