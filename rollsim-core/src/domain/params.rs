//! Immutable simulation inputs.

use serde::{Deserialize, Serialize};

use crate::error::{
    require_leverage, require_positive, require_unit_closed, require_unit_open,
    require_unit_open_closed, ConfigurationError,
};
use crate::risk::LeverageDeRiskPolicy;

/// Default caller-imposed bound on accepted price steps.
pub const DEFAULT_MAX_STEPS: usize = 10_000;

/// How position size is denominated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MarginMode {
    /// Position measured in the capital unit (e.g. USDT notional).
    #[default]
    Quote,
    /// Position measured in units of the traded asset.
    Base,
}

/// Re-investment policy applied when an add-on fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StrategyMode {
    /// Capital keeps compounding across add-ons.
    #[default]
    FloatingProfit,
    /// Capital is reset to initial margin plus reserve after each add-on.
    RollingReset,
}

impl StrategyMode {
    pub const ALL: [StrategyMode; 2] = [StrategyMode::FloatingProfit, StrategyMode::RollingReset];

    pub fn name(&self) -> &'static str {
        match self {
            Self::FloatingProfit => "floating_profit",
            Self::RollingReset => "rolling_reset",
        }
    }
}

impl std::fmt::Display for StrategyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Source of prices after the start price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PricePath {
    /// `price *= 1 + step_fraction` every step. Monotonically rising.
    #[default]
    Geometric,
    /// Caller-supplied prices, consumed in order after the start price.
    Explicit { prices: Vec<f64> },
}

/// Everything one rolling simulation run needs.
///
/// Collected and validated once by the caller; the engine never reads any
/// other state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
    pub margin_mode: MarginMode,
    pub start_price: f64,
    pub target_price: f64,
    /// Starting capital, in the capital unit.
    pub initial_margin: f64,
    pub initial_leverage: u32,
    /// Unrealized-profit-to-capital ratio that fires an add-on, in (0, 1].
    pub add_on_trigger: f64,
    /// Share of the realized profit slice added back to capital, in [0, 1].
    pub add_on_allocation: f64,
    /// Share of the realized profit slice set aside, in [0, 1].
    pub reserve_fraction: f64,
    /// Geometric price step, in (0, 1].
    pub step_fraction: f64,
    /// Trailing drawdown from peak that stops the run, in (0, 1).
    pub drawdown_stop: f64,
    pub strategy_mode: StrategyMode,
    pub max_steps: usize,
    pub price_path: PricePath,
    pub derisk: LeverageDeRiskPolicy,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            margin_mode: MarginMode::Quote,
            start_price: 100.0,
            target_price: 200.0,
            initial_margin: 100.0,
            initial_leverage: 10,
            add_on_trigger: 0.15,
            add_on_allocation: 0.8,
            reserve_fraction: 0.2,
            step_fraction: 0.02,
            drawdown_stop: 0.10,
            strategy_mode: StrategyMode::FloatingProfit,
            max_steps: DEFAULT_MAX_STEPS,
            price_path: PricePath::Geometric,
            derisk: LeverageDeRiskPolicy::default(),
        }
    }
}

impl SimulationParameters {
    /// Reject out-of-range or non-positive values.
    ///
    /// `add_on_allocation + reserve_fraction > 1` is accepted; the run flags it
    /// as a warning instead.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        require_positive("start_price", self.start_price)?;
        require_positive("target_price", self.target_price)?;
        require_positive("initial_margin", self.initial_margin)?;
        require_leverage("initial_leverage", self.initial_leverage)?;
        require_unit_open_closed("add_on_trigger", self.add_on_trigger)?;
        require_unit_closed("add_on_allocation", self.add_on_allocation)?;
        require_unit_closed("reserve_fraction", self.reserve_fraction)?;
        require_unit_open_closed("step_fraction", self.step_fraction)?;
        require_unit_open("drawdown_stop", self.drawdown_stop)?;
        if self.max_steps == 0 {
            return Err(ConfigurationError::ZeroCap { field: "max_steps" });
        }
        if let PricePath::Explicit { prices } = &self.price_path {
            if prices.is_empty() {
                return Err(ConfigurationError::EmptyPricePath);
            }
            for (index, &value) in prices.iter().enumerate() {
                if !(value.is_finite() && value > 0.0) {
                    return Err(ConfigurationError::InvalidPathPrice { index, value });
                }
            }
        }
        self.derisk.validate()
    }

    /// True when add-on and reserve slices together exceed the realized profit.
    pub fn is_overallocated(&self) -> bool {
        self.add_on_allocation + self.reserve_fraction > 1.0
    }

    /// Copy with a different strategy mode; everything else is unchanged.
    pub fn with_mode(&self, mode: StrategyMode) -> Self {
        Self {
            strategy_mode: mode,
            ..self.clone()
        }
    }

    /// Copy with a different starting leverage.
    pub fn with_leverage(&self, leverage: u32) -> Self {
        Self {
            initial_leverage: leverage,
            ..self.clone()
        }
    }
}
