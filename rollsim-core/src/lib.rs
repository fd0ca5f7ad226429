//! RollSim Core — parameters, risk policies, rolling position simulator, growth projector.
//!
//! This crate contains the simulation engine:
//! - Domain types (simulation parameters, step records, add-on events)
//! - Leverage de-risk policy, liquidation price and position sizing formulas
//! - Step-by-step rolling position simulator with trailing drawdown stop
//! - Fixed-rate compounding projector with a companion lot-growth sequence
//! - Parameter fingerprinting for reproducible result identification
//!
//! Nothing in this crate performs file or network I/O.

pub mod domain;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod projector;
pub mod risk;

pub use domain::{
    AddOnEvent, MarginMode, PricePath, SimulationParameters, StepRecord, StrategyMode,
};
pub use engine::{
    run_rolling_simulation, RunSummary, SimulationOutcome, SimulationWarning, Termination,
};
pub use error::ConfigurationError;
pub use fingerprint::ParamsHash;
pub use projector::{
    project_position_advance, run_growth_projection, GrowthProjection, LotRecord, RoundRecord,
    DEFAULT_MAX_ROUNDS,
};
pub use risk::{
    liquidation_price, next_leverage, position_size, DeRiskTier, LeverageDeRiskPolicy, LeverageTier,
};
