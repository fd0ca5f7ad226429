//! Mutable run state and run result types.

use serde::{Deserialize, Serialize};

use crate::domain::{AddOnEvent, MarginMode, SimulationParameters, StepRecord, StrategyMode};
use crate::fingerprint::ParamsHash;
use crate::risk::{liquidation_price, position_size};

/// State that evolves step-by-step during one run.
///
/// Owned by exactly one run; two strategy modes never share an instance.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    pub price: f64,
    pub peak_price: f64,
    pub capital: f64,
    pub leverage: u32,
    /// Always `position_size(capital, leverage, price, margin_mode)`.
    pub position: f64,
    pub reserve_total: f64,
    pub add_on_count: usize,
    margin_mode: MarginMode,
}

impl SimulationState {
    pub fn new(params: &SimulationParameters) -> Self {
        let mut state = Self {
            price: params.start_price,
            peak_price: params.start_price,
            capital: params.initial_margin,
            leverage: params.initial_leverage,
            position: 0.0,
            reserve_total: 0.0,
            add_on_count: 0,
            margin_mode: params.margin_mode,
        };
        state.resize();
        state
    }

    /// Recompute position from capital, leverage and price.
    ///
    /// The only place `position` is written.
    pub fn resize(&mut self) {
        self.position = position_size(self.capital, self.leverage, self.price, self.margin_mode);
    }

    pub fn liquidation_price(&self) -> f64 {
        liquidation_price(self.price, self.leverage)
    }

    pub fn record(&self, step: usize) -> StepRecord {
        StepRecord {
            step,
            price: self.price,
            capital: self.capital,
            position: self.position,
            reserve_total: self.reserve_total,
            leverage: self.leverage,
            liquidation_price: self.liquidation_price(),
        }
    }

    pub fn add_on_event(&self, step: usize) -> AddOnEvent {
        AddOnEvent {
            step,
            price: self.price,
            capital: self.capital,
            position: self.position,
        }
    }
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    StoppedByDrawdown,
    ReachedTarget,
    StepLimitReached,
    /// An explicit price path ran out before the target.
    PathExhausted,
}

/// Non-fatal conditions worth showing next to a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationWarning {
    /// Leverage was 1 at some step, so the liquidation price reads 0.
    ZeroLiquidationPrice,
    /// The step cap ended the run before the target.
    StepCapReached,
    /// A growth projection hit its round cap below target.
    TargetUnreachable,
    /// Add-on and reserve fractions sum above 1.
    Overallocation,
}

/// End-of-run figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub final_price: f64,
    pub peak_price: f64,
    pub final_capital: f64,
    pub final_position: f64,
    pub final_leverage: u32,
    pub final_liquidation_price: f64,
    pub reserve_total: f64,
    pub add_on_count: usize,
    pub step_count: usize,
    pub price_change_fraction: f64,
    pub floating_profit: f64,
    /// `floating_profit + reserve_total`.
    pub final_profit: f64,
    /// `final_profit / initial_margin`.
    pub return_on_margin: f64,
}

impl RunSummary {
    pub fn compute(state: &SimulationState, params: &SimulationParameters, step_count: usize) -> Self {
        let price_change_fraction = (state.price - params.start_price) / params.start_price;
        let denomination = match params.margin_mode {
            MarginMode::Base => state.price,
            MarginMode::Quote => 1.0,
        };
        let floating_profit = state.position * price_change_fraction * denomination;
        let final_profit = floating_profit + state.reserve_total;
        Self {
            final_price: state.price,
            peak_price: state.peak_price,
            final_capital: state.capital,
            final_position: state.position,
            final_leverage: state.leverage,
            final_liquidation_price: state.liquidation_price(),
            reserve_total: state.reserve_total,
            add_on_count: state.add_on_count,
            step_count,
            price_change_fraction,
            floating_profit,
            final_profit,
            return_on_margin: final_profit / params.initial_margin,
        }
    }
}

/// Complete result of one rolling simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutcome {
    pub mode: StrategyMode,
    pub termination: Termination,
    pub steps: Vec<StepRecord>,
    pub add_ons: Vec<AddOnEvent>,
    pub summary: RunSummary,
    pub warnings: Vec<SimulationWarning>,
    /// Fingerprint of the parameters (with `mode`) that produced this run.
    pub fingerprint: ParamsHash,
}

impl SimulationOutcome {
    pub fn has_warning(&self, warning: SimulationWarning) -> bool {
        self.warnings.contains(&warning)
    }

    /// Leverage per step, for charting.
    pub fn leverage_series(&self) -> Vec<u32> {
        self.steps.iter().map(|s| s.leverage).collect()
    }

    pub fn capital_series(&self) -> Vec<f64> {
        self.steps.iter().map(|s| s.capital).collect()
    }
}
