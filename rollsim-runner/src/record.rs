//! Persisted strategy record — the save/load format for a strategy setup.
//!
//! Field-for-field: strategy name, coin, margin mode, original margin,
//! floating profit, price range, leverage options, add-on trigger and ratio,
//! average gain, growth target and a free-text note. Percent fields are
//! stored as percentages (20 means 20 %).

use std::path::{Path, PathBuf};

use rollsim_core::projector::{project_position_advance, DEFAULT_MAX_ROUNDS};
use rollsim_core::risk::validate_leverage_options;
use rollsim_core::{
    run_growth_projection, ConfigurationError, GrowthProjection, LotRecord, MarginMode,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::{liquidation_grid, price_count, LiquidationGrid};
use crate::sweep::SweepConfig;

/// Current schema version for strategy records.
pub const RECORD_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("failed to access record {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid record JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported record schema version {found} (max supported: {max})")]
    UnsupportedSchema { found: u32, max: u32 },
    #[error("invalid record: {0}")]
    Invalid(#[from] ConfigurationError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyRecord {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub strategy_name: String,
    pub coin: String,
    pub margin_mode: MarginMode,
    pub original_margin: f64,
    /// Floating profit added on top of the original margin.
    pub profit: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub price_step: f64,
    pub leverage_options: Vec<u32>,
    pub add_trigger_pct: f64,
    pub add_ratio_pct: f64,
    /// Capital growth per round for the record's own projection. The leverage
    /// sweep treats it as the price move per round and scales it by each
    /// candidate's leverage.
    pub average_gain_pct: f64,
    pub growth_target: f64,
    #[serde(default)]
    pub note: String,
}

fn default_schema_version() -> u32 {
    RECORD_SCHEMA_VERSION
}

impl Default for StrategyRecord {
    fn default() -> Self {
        Self {
            schema_version: RECORD_SCHEMA_VERSION,
            strategy_name: "Floating-profit add-on".into(),
            coin: "BTC".into(),
            margin_mode: MarginMode::Quote,
            original_margin: 100.0,
            profit: 0.0,
            min_price: 100.0,
            max_price: 1_000.0,
            price_step: 100.0,
            leverage_options: vec![10, 20],
            add_trigger_pct: 20.0,
            add_ratio_pct: 50.0,
            average_gain_pct: 30.0,
            growth_target: 100_000.0,
            note: "Add 50% to the position every time floating profit reaches 20%.".into(),
        }
    }
}

impl StrategyRecord {
    pub fn to_json(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a record, rejecting newer schema versions.
    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        let record: Self = serde_json::from_str(json)?;
        if record.schema_version > RECORD_SCHEMA_VERSION {
            return Err(RecordError::UnsupportedSchema {
                found: record.schema_version,
                max: RECORD_SCHEMA_VERSION,
            });
        }
        Ok(record)
    }

    pub fn save(&self, path: &Path) -> Result<(), RecordError> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|source| RecordError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, RecordError> {
        let json = std::fs::read_to_string(path).map_err(|source| RecordError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Original margin plus floating profit; the projection's starting capital.
    pub fn total_margin(&self) -> f64 {
        self.original_margin + self.profit
    }

    pub fn average_gain(&self) -> f64 {
        self.average_gain_pct / 100.0
    }

    pub fn add_ratio(&self) -> f64 {
        self.add_ratio_pct / 100.0
    }

    pub fn validate(&self) -> Result<(), RecordError> {
        validate_leverage_options(&self.leverage_options)?;
        price_count(self.min_price, self.max_price, self.price_step)?;
        if !(self.profit.is_finite() && self.profit >= 0.0) {
            return Err(ConfigurationError::NonPositive {
                field: "profit",
                value: self.profit,
            }
            .into());
        }
        for (field, value) in [
            ("add_trigger_pct", self.add_trigger_pct),
            ("add_ratio_pct", self.add_ratio_pct),
        ] {
            if !(value > 0.0 && value <= 100.0) {
                return Err(ConfigurationError::FractionOutOfRange {
                    field,
                    range: "(0, 100]",
                    value,
                }
                .into());
            }
        }
        Ok(())
    }

    /// Growth projection from total margin at the average gain per round.
    pub fn projection(&self) -> Result<GrowthProjection, RecordError> {
        Ok(run_growth_projection(
            self.total_margin(),
            self.growth_target,
            self.average_gain(),
            DEFAULT_MAX_ROUNDS,
        )?)
    }

    /// Lot projection for as many rounds as the growth projection took.
    pub fn lot_projection(&self, rounds: usize) -> Result<Vec<LotRecord>, RecordError> {
        Ok(project_position_advance(self.add_ratio(), rounds)?)
    }

    pub fn liquidation_grid(&self) -> Result<LiquidationGrid, RecordError> {
        Ok(liquidation_grid(
            self.min_price,
            self.max_price,
            self.price_step,
            &self.leverage_options,
        )?)
    }

    /// Sweep inputs: `average_gain_pct` becomes the per-round price move, so
    /// each candidate grows at `average_gain * leverage`.
    pub fn sweep_config(&self) -> SweepConfig {
        SweepConfig {
            leverage_options: self.leverage_options.clone(),
            starting_capital: self.total_margin(),
            growth_target: self.growth_target,
            average_gain: self.average_gain(),
            max_rounds: DEFAULT_MAX_ROUNDS,
            simulation: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_record_is_valid() {
        assert!(StrategyRecord::default().validate().is_ok());
    }

    #[test]
    fn json_roundtrip() {
        let record = StrategyRecord {
            note: "multi-line\nnote".into(),
            ..StrategyRecord::default()
        };
        let loaded = StrategyRecord::from_json(&record.to_json().unwrap()).unwrap();
        assert_eq!(loaded, record);
    }

    #[test]
    fn json_rejects_newer_schema() {
        let mut record = StrategyRecord::default();
        record.schema_version = RECORD_SCHEMA_VERSION + 1;
        let json = serde_json::to_string(&record).unwrap();
        assert!(matches!(
            StrategyRecord::from_json(&json),
            Err(RecordError::UnsupportedSchema { .. })
        ));
    }

    #[test]
    fn missing_schema_version_defaults_to_current() {
        let mut value = serde_json::to_value(StrategyRecord::default()).unwrap();
        value.as_object_mut().unwrap().remove("schema_version");
        let record = StrategyRecord::from_json(&value.to_string()).unwrap();
        assert_eq!(record.schema_version, RECORD_SCHEMA_VERSION);
    }

    #[test]
    fn projection_starts_from_total_margin() {
        let record = StrategyRecord {
            profit: 50.0,
            ..StrategyRecord::default()
        };
        let projection = record.projection().unwrap();
        assert_eq!(projection.starting_capital, 150.0);
        assert!(projection.reached_target);
        assert_eq!(projection.rounds[0].round_profit, 45.0);
    }

    #[test]
    fn lot_projection_uses_add_ratio() {
        let lots = StrategyRecord::default().lot_projection(2).unwrap();
        assert_eq!(lots[0].lot_added, 0.5);
        assert_eq!(lots[1].position, 2.25);
    }

    #[test]
    fn grid_covers_price_range() {
        let grid = StrategyRecord::default().liquidation_grid().unwrap();
        assert_eq!(grid.prices.len(), 10);
        assert_eq!(grid.rows.len(), 2);
    }

    #[test]
    fn rejects_bad_leverage_options() {
        let record = StrategyRecord {
            leverage_options: vec![150],
            ..StrategyRecord::default()
        };
        assert!(matches!(record.validate(), Err(RecordError::Invalid(_))));
    }

    #[test]
    fn rejects_price_range_too_wide_for_a_grid() {
        let record = StrategyRecord {
            min_price: 1.0,
            max_price: 1e30,
            price_step: 1.0,
            ..StrategyRecord::default()
        };
        assert!(matches!(
            record.validate(),
            Err(RecordError::Invalid(ConfigurationError::GridTooLarge { .. }))
        ));
        assert!(record.liquidation_grid().is_err());
    }

    #[test]
    fn sweep_scales_average_gain_by_leverage() {
        let record = StrategyRecord::default();
        let projection = record.projection().unwrap();
        assert!((projection.growth_rate - 0.30).abs() < 1e-12);

        let candidates = crate::sweep_leverage(&record.sweep_config()).unwrap();
        for candidate in &candidates {
            let expected = record.average_gain() * f64::from(candidate.leverage);
            assert!((candidate.growth_rate - expected).abs() < 1e-12);
        }
        assert!(candidates[0].rounds_to_target() < Some(projection.round_count()));
    }
}
