// Engine settings, loaded from an optional JSON file.
use crate::error::EngineError;
use serde::Deserialize;
use std::path::Path;
use tracing::Level;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
    /// Channel given to ingested rows that leave it blank.
    pub default_channel: String,
    pub default_product: String,
    pub default_sales_rep: String,
    /// One of trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            default_channel: "Delivery".to_string(),
            default_product: "General".to_string(),
            default_sales_rep: "Unassigned".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl EngineSettings {
    /// Reads settings from a JSON file. Keys left out keep their defaults.
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, EngineError> {
        let settings: EngineSettings = serde_json::from_str(raw)
            .map_err(|e| EngineError::ConfigError(format!("invalid settings: {}", e)))?;
        settings.max_log_level()?;
        Ok(settings)
    }

    pub fn max_log_level(&self) -> Result<Level, EngineError> {
        self.log_level
            .parse::<Level>()
            .map_err(|_| EngineError::ConfigError(format!("unknown log level '{}'", self.log_level)))
    }
}
