//! Side-by-side comparison of the two re-investment policies.
//!
//! Both modes run from the same parameters, each with its own state. The
//! runs are independent, so they execute on two rayon workers.

use rollsim_core::{
    run_rolling_simulation, ConfigurationError, SimulationOutcome, SimulationParameters,
    StrategyMode, Termination,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Current schema version for persisted comparisons.
pub const SCHEMA_VERSION: u32 = 1;

/// Headline figures for one strategy mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategySummary {
    pub mode: StrategyMode,
    pub termination: Termination,
    pub final_profit: f64,
    pub return_on_margin: f64,
    pub final_capital: f64,
    pub reserve_total: f64,
    pub add_on_count: usize,
    pub final_leverage: u32,
    pub final_liquidation_price: f64,
    pub step_count: usize,
}

impl StrategySummary {
    pub fn from_outcome(outcome: &SimulationOutcome) -> Self {
        let s = &outcome.summary;
        Self {
            mode: outcome.mode,
            termination: outcome.termination,
            final_profit: s.final_profit,
            return_on_margin: s.return_on_margin,
            final_capital: s.final_capital,
            reserve_total: s.reserve_total,
            add_on_count: s.add_on_count,
            final_leverage: s.final_leverage,
            final_liquidation_price: s.final_liquidation_price,
            step_count: s.step_count,
        }
    }
}

/// Both strategy runs plus the parameters that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub params: SimulationParameters,
    pub floating: SimulationOutcome,
    pub rolling: SimulationOutcome,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl ComparisonResult {
    pub fn outcome(&self, mode: StrategyMode) -> &SimulationOutcome {
        match mode {
            StrategyMode::FloatingProfit => &self.floating,
            StrategyMode::RollingReset => &self.rolling,
        }
    }

    /// Summaries in `[floating, rolling]` order.
    pub fn summaries(&self) -> [StrategySummary; 2] {
        [
            StrategySummary::from_outcome(&self.floating),
            StrategySummary::from_outcome(&self.rolling),
        ]
    }

    /// `floating.final_profit - rolling.final_profit`.
    pub fn profit_advantage(&self) -> f64 {
        self.floating.summary.final_profit - self.rolling.summary.final_profit
    }

    /// Mode with the higher final profit. Ties go to rolling-reset.
    pub fn better_mode(&self) -> StrategyMode {
        if self.profit_advantage() > 0.0 {
            StrategyMode::FloatingProfit
        } else {
            StrategyMode::RollingReset
        }
    }
}

/// Run both strategy modes on the same parameters.
pub fn compare_strategies(
    params: &SimulationParameters,
) -> Result<ComparisonResult, ConfigurationError> {
    params.validate()?;

    let (floating, rolling) = rayon::join(
        || run_rolling_simulation(params, StrategyMode::FloatingProfit),
        || run_rolling_simulation(params, StrategyMode::RollingReset),
    );
    let (floating, rolling) = (floating?, rolling?);

    info!(
        floating_profit = floating.summary.final_profit,
        rolling_profit = rolling.summary.final_profit,
        floating_add_ons = floating.summary.add_on_count,
        rolling_add_ons = rolling.summary.add_on_count,
        "strategy comparison finished"
    );

    Ok(ComparisonResult {
        schema_version: SCHEMA_VERSION,
        params: params.clone(),
        floating,
        rolling,
    })
}
