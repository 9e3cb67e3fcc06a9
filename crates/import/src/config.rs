use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::recurring::DetectorConfig;
use crate::rules::CategoryRule;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// User configuration. Every section is optional in the file.
///
/// ```toml
/// [recurring]
/// amount_tolerance_percent = 15
/// monthly = { min_days = 26, max_days = 34 }
///
/// [accounts]
/// DE89370400440532013000 = "checking"
///
/// [[category_rules]]
/// name = "Streaming"
/// pattern = "netflix"
/// category_id = "streaming"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabulaConfig {
    pub recurring: DetectorConfig,
    /// IBAN → internal account id.
    pub accounts: BTreeMap<String, String>,
    pub category_rules: Vec<CategoryRule>,
}

impl TabulaConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}
