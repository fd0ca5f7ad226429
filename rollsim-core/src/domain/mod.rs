//! Domain types for RollSim

pub mod params;
pub mod records;

pub use params::{MarginMode, PricePath, SimulationParameters, StrategyMode};
pub use records::{AddOnEvent, StepRecord};
