//! Step loop for the rolling add-on strategy.

use tracing::debug;

use crate::domain::{MarginMode, PricePath, SimulationParameters, StepRecord, StrategyMode};
use crate::error::ConfigurationError;
use crate::risk::next_leverage;

use super::state::{RunSummary, SimulationOutcome, SimulationState, SimulationWarning, Termination};

/// Yields successive prices and the fractional move that produced each.
enum PriceSteps<'a> {
    Geometric { step_fraction: f64 },
    Explicit { prices: std::slice::Iter<'a, f64> },
}

impl<'a> PriceSteps<'a> {
    fn new(params: &'a SimulationParameters) -> Self {
        match &params.price_path {
            PricePath::Geometric => Self::Geometric {
                step_fraction: params.step_fraction,
            },
            PricePath::Explicit { prices } => Self::Explicit {
                prices: prices.iter(),
            },
        }
    }

    /// Next `(price, step_fraction)`, or `None` once an explicit path runs out.
    fn advance(&mut self, price: f64) -> Option<(f64, f64)> {
        match self {
            Self::Geometric { step_fraction } => {
                Some((price * (1.0 + *step_fraction), *step_fraction))
            }
            Self::Explicit { prices } => prices.next().map(|&next| (next, next / price - 1.0)),
        }
    }
}

/// Run one rolling simulation under `mode`.
///
/// Parameters are validated first; nothing runs on invalid input. The run is
/// a pure function of its inputs: identical calls produce identical outcomes.
pub fn run_rolling_simulation(
    params: &SimulationParameters,
    mode: StrategyMode,
) -> Result<SimulationOutcome, ConfigurationError> {
    params.validate()?;

    let mut state = SimulationState::new(params);
    let mut path = PriceSteps::new(params);
    let mut steps = Vec::new();
    let mut add_ons = Vec::new();

    let termination = loop {
        if state.price >= params.target_price {
            break Termination::ReachedTarget;
        }
        if steps.len() >= params.max_steps {
            break Termination::StepLimitReached;
        }
        let step = steps.len() + 1;

        // ─── Price ───
        let Some((price, step_fraction)) = path.advance(state.price) else {
            break Termination::PathExhausted;
        };
        state.price = price;
        state.resize();
        state.peak_price = state.peak_price.max(price);

        // ─── Trailing drawdown stop ───
        // The breaching step is not recorded.
        if price < state.peak_price * (1.0 - params.drawdown_stop) {
            debug!(step, price, peak = state.peak_price, "drawdown stop triggered");
            break Termination::StoppedByDrawdown;
        }

        // ─── De-risk ───
        let leverage = next_leverage(
            state.capital,
            params.initial_margin,
            state.leverage,
            &params.derisk,
        );
        if leverage != state.leverage {
            debug!(step, from = state.leverage, to = leverage, capital = state.capital, "de-risked");
            state.leverage = leverage;
            state.resize();
        }

        // ─── Floating profit and add-on ───
        let per_unit_profit = match params.margin_mode {
            MarginMode::Base => step_fraction * price,
            MarginMode::Quote => step_fraction,
        };
        let unrealized = state.position * per_unit_profit;
        if unrealized / state.capital >= params.add_on_trigger {
            // Realize a fixed slice of capital, not the whole unrealized gain.
            let realized = state.capital * params.add_on_trigger;
            state.capital += realized * params.add_on_allocation;
            state.reserve_total += realized * params.reserve_fraction;
            if mode == StrategyMode::RollingReset {
                state.capital = params.initial_margin + state.reserve_total;
            }
            state.resize();
            state.add_on_count += 1;
            debug!(
                step,
                price,
                capital = state.capital,
                reserve = state.reserve_total,
                "add-on"
            );
            add_ons.push(state.add_on_event(step));
        }

        steps.push(state.record(step));
    };

    debug!(?termination, steps = steps.len(), %mode, "simulation finished");

    let summary = RunSummary::compute(&state, params, steps.len());
    let warnings = collect_warnings(params, &steps, &state, termination);

    Ok(SimulationOutcome {
        mode,
        termination,
        steps,
        add_ons,
        summary,
        warnings,
        fingerprint: params.with_mode(mode).fingerprint(),
    })
}

fn collect_warnings(
    params: &SimulationParameters,
    steps: &[StepRecord],
    state: &SimulationState,
    termination: Termination,
) -> Vec<SimulationWarning> {
    let mut warnings = Vec::new();
    if state.leverage == 1 || steps.iter().any(|s| s.leverage == 1) {
        warnings.push(SimulationWarning::ZeroLiquidationPrice);
    }
    if termination == Termination::StepLimitReached {
        warnings.push(SimulationWarning::StepCapReached);
    }
    if params.is_overallocated() {
        warnings.push(SimulationWarning::Overallocation);
    }
    warnings
}
