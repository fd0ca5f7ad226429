//! Pure risk policies: leverage de-risking, liquidation price, position sizing.
//!
//! All functions here are side-effect free. The simulator calls them after
//! every state change; callers can use them directly for tables and checks.

pub mod derisk;
pub mod liquidation;
pub mod sizing;
pub mod tier;

pub use derisk::{next_leverage, DeRiskTier, LeverageDeRiskPolicy};
pub use liquidation::liquidation_price;
pub use sizing::position_size;
pub use tier::{validate_leverage_options, LeverageTier, MAX_LEVERAGE_OPTION};
