//! TOML simulation configuration.
//!
//! ```toml
//! [simulation]
//! margin_mode = "quote"
//! start_price = 100.0
//! target_price = 200.0
//! initial_leverage = 10
//! strategy_mode = "rolling_reset"
//!
//! [[derisk]]
//! capital_multiple = 3.0
//! max_leverage = 5
//! ```
//!
//! Missing keys take the `SimulationParameters` defaults. A `derisk` array
//! replaces the default de-risk table; `derisk = []` disables de-risking.

use std::path::{Path, PathBuf};

use rollsim_core::{ConfigurationError, DeRiskTier, LeverageDeRiskPolicy, SimulationParameters};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid simulation parameters: {0}")]
    Invalid(#[from] ConfigurationError),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub simulation: SimulationParameters,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub derisk: Option<Vec<DeRiskTier>>,
}

impl SimulationConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate. An invalid config never reaches the engine.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.to_parameters()?;
        Ok(config)
    }

    /// Resolve the `derisk` override into validated parameters.
    pub fn to_parameters(&self) -> Result<SimulationParameters, ConfigError> {
        let mut params = self.simulation.clone();
        if let Some(tiers) = &self.derisk {
            params.derisk = LeverageDeRiskPolicy::new(tiers.clone())?;
        }
        params.validate()?;
        Ok(params)
    }
}
