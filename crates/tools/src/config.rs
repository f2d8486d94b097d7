use std::fs;
use std::path::Path;

use formats::{DEFAULT_NAME_PROPERTY, RegionOptions};
use scoring::ScoringConfig;
use serde::{Deserialize, Serialize};

use crate::error::CliError;

/// `--config` file contents. Every field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub scoring: ScoringConfig,
    pub name_property: String,
    /// TopoJSON object holding the regions.
    pub object: Option<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            name_property: DEFAULT_NAME_PROPERTY.to_string(),
            object: None,
        }
    }
}

impl CliConfig {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let payload = fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&payload).map_err(|reason| CliError::Config {
            path: path.to_path_buf(),
            reason,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, String> {
        let config: Self = serde_json::from_str(json).map_err(|e| e.to_string())?;
        config.scoring.validate().map_err(|e| e.to_string())?;
        Ok(config)
    }

    pub fn region_options(&self) -> RegionOptions {
        RegionOptions {
            name_property: self.name_property.clone(),
            object: self.object.clone(),
        }
    }
}
