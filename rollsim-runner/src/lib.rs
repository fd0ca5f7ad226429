//! RollSim Runner — orchestration on top of `rollsim-core`.
//!
//! This crate provides:
//! - Floating-profit vs rolling-reset comparison
//! - Leverage candidate sweeps (growth projection + optional simulation)
//! - Liquidation price grids over a price range
//! - TOML simulation config and the persisted JSON strategy record
//! - CSV / JSON / Markdown artifact export

pub mod compare;
pub mod config;
pub mod export;
pub mod grid;
pub mod record;
pub mod sweep;

pub use compare::{compare_strategies, ComparisonResult, StrategySummary, SCHEMA_VERSION};
pub use config::{ConfigError, SimulationConfig};
pub use export::{load_artifacts, save_artifacts};
pub use grid::{
    liquidation_grid, price_count, price_range, LiquidationGrid, LiquidationRow, MAX_GRID_POINTS,
};
pub use record::{RecordError, StrategyRecord, RECORD_SCHEMA_VERSION};
pub use sweep::{sweep_leverage, CandidateResult, SweepConfig};
