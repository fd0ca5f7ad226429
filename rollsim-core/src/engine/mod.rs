//! Rolling position engine — step-by-step price loop and supporting state.
//!
//! Each accepted step runs, in order:
//!
//! 1. Advance price, update the running peak
//! 2. Trailing drawdown stop
//! 3. Leverage de-risk
//! 4. Floating-profit evaluation and add-on
//! 5. Record the step

pub mod simulator;
pub mod state;

pub use simulator::run_rolling_simulation;
pub use state::{RunSummary, SimulationOutcome, SimulationState, SimulationWarning, Termination};
