//! Fixed-rate compounding projector.
//!
//! Estimates how many growth rounds a capital value needs to reach a target.
//! A companion lot projection compounds a unit position by the add ratio each
//! round; it is illustrative and unrelated to the leveraged position of the
//! rolling simulator.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::SimulationWarning;
use crate::error::{require_positive, require_unit_closed, ConfigurationError};

/// Round cap used when callers don't supply one.
pub const DEFAULT_MAX_ROUNDS: usize = 100;

/// Capital after one growth round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round: usize,
    pub capital: f64,
    pub round_profit: f64,
}

/// Unit position after one add round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LotRecord {
    pub round: usize,
    pub lot_added: f64,
    pub position: f64,
    /// `lot_added / position` as a percentage, rounded to 2 decimals.
    pub push_ratio_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthProjection {
    pub starting_capital: f64,
    pub target: f64,
    pub growth_rate: f64,
    pub rounds: Vec<RoundRecord>,
    pub reached_target: bool,
    pub warnings: Vec<SimulationWarning>,
}

impl GrowthProjection {
    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }

    pub fn final_capital(&self) -> f64 {
        self.rounds
            .last()
            .map(|r| r.capital)
            .unwrap_or(self.starting_capital)
    }
}

/// Compound `capital` by `growth_rate` per round until it reaches `target`
/// or `max_rounds` rounds have run.
///
/// A zero growth rate is valid: it runs to the cap and comes back flagged
/// `TargetUnreachable`.
pub fn run_growth_projection(
    capital: f64,
    target: f64,
    growth_rate: f64,
    max_rounds: usize,
) -> Result<GrowthProjection, ConfigurationError> {
    require_positive("capital", capital)?;
    require_positive("target", target)?;
    if !(growth_rate.is_finite() && growth_rate >= 0.0) {
        return Err(ConfigurationError::NonPositive {
            field: "growth_rate",
            value: growth_rate,
        });
    }
    if max_rounds == 0 {
        return Err(ConfigurationError::ZeroCap { field: "max_rounds" });
    }

    let mut current = capital;
    let mut rounds = Vec::new();
    while current < target && rounds.len() < max_rounds {
        let round_profit = current * growth_rate;
        current += round_profit;
        rounds.push(RoundRecord {
            round: rounds.len() + 1,
            capital: current,
            round_profit,
        });
    }

    let reached_target = current >= target;
    let mut warnings = Vec::new();
    if !reached_target {
        warnings.push(SimulationWarning::TargetUnreachable);
    }
    debug!(rounds = rounds.len(), reached_target, "growth projection finished");

    Ok(GrowthProjection {
        starting_capital: capital,
        target,
        growth_rate,
        rounds,
        reached_target,
        warnings,
    })
}

/// Grow a unit position by `add_ratio` of itself for `rounds` rounds.
pub fn project_position_advance(
    add_ratio: f64,
    rounds: usize,
) -> Result<Vec<LotRecord>, ConfigurationError> {
    require_unit_closed("add_ratio", add_ratio)?;

    let mut position = 1.0_f64;
    let lots = (1..=rounds)
        .map(|round| {
            let lot_added = position * add_ratio;
            position += lot_added;
            LotRecord {
                round,
                lot_added,
                position,
                push_ratio_pct: (lot_added / position * 100.0 * 100.0).round() / 100.0,
            }
        })
        .collect();
    Ok(lots)
}
