//! Leverage candidate sweeps.
//!
//! Each candidate gets its own growth projection (and optionally its own
//! rolling simulation). Candidates share nothing, so they run on rayon and
//! come back in input order.

use rayon::prelude::*;
use rollsim_core::projector::DEFAULT_MAX_ROUNDS;
use rollsim_core::risk::validate_leverage_options;
use rollsim_core::{
    run_growth_projection, run_rolling_simulation, ConfigurationError, GrowthProjection,
    LeverageTier, SimulationOutcome, SimulationParameters,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Leverage candidates and the projection inputs shared by all of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    pub leverage_options: Vec<u32>,
    pub starting_capital: f64,
    pub growth_target: f64,
    /// Average favourable price move per round, as a fraction.
    pub average_gain: f64,
    pub max_rounds: usize,
    /// When set, each candidate also runs a rolling simulation at its leverage.
    pub simulation: Option<SimulationParameters>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            leverage_options: vec![10, 20],
            starting_capital: 100.0,
            growth_target: 100_000.0,
            average_gain: 0.30,
            max_rounds: DEFAULT_MAX_ROUNDS,
            simulation: None,
        }
    }
}

/// Results for one leverage candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateResult {
    pub leverage: u32,
    pub tier: LeverageTier,
    /// `average_gain * leverage`.
    pub growth_rate: f64,
    pub projection: GrowthProjection,
    pub simulation: Option<SimulationOutcome>,
}

impl CandidateResult {
    pub fn rounds_to_target(&self) -> Option<usize> {
        self.projection
            .reached_target
            .then(|| self.projection.round_count())
    }
}

/// Run every leverage candidate.
pub fn sweep_leverage(config: &SweepConfig) -> Result<Vec<CandidateResult>, ConfigurationError> {
    validate_leverage_options(&config.leverage_options)?;
    if let Some(params) = &config.simulation {
        params.validate()?;
    }

    let results = config
        .leverage_options
        .par_iter()
        .map(|&leverage| run_candidate(config, leverage))
        .collect::<Result<Vec<_>, _>>()?;

    info!(candidates = results.len(), "leverage sweep finished");
    Ok(results)
}

fn run_candidate(config: &SweepConfig, leverage: u32) -> Result<CandidateResult, ConfigurationError> {
    let growth_rate = config.average_gain * f64::from(leverage);
    let projection = run_growth_projection(
        config.starting_capital,
        config.growth_target,
        growth_rate,
        config.max_rounds,
    )?;
    let simulation = config
        .simulation
        .as_ref()
        .map(|params| {
            let params = params.with_leverage(leverage);
            run_rolling_simulation(&params, params.strategy_mode)
        })
        .transpose()?;

    Ok(CandidateResult {
        leverage,
        tier: LeverageTier::classify(leverage),
        growth_rate,
        projection,
        simulation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_input_order() {
        let config = SweepConfig {
            leverage_options: vec![50, 5, 20, 1],
            ..SweepConfig::default()
        };
        let results = sweep_leverage(&config).unwrap();
        let order: Vec<u32> = results.iter().map(|r| r.leverage).collect();
        assert_eq!(order, vec![50, 5, 20, 1]);
    }

    #[test]
    fn higher_leverage_needs_fewer_rounds() {
        let config = SweepConfig {
            leverage_options: vec![1, 10],
            ..SweepConfig::default()
        };
        let results = sweep_leverage(&config).unwrap();
        let slow = results[0].rounds_to_target().unwrap();
        let fast = results[1].rounds_to_target().unwrap();
        assert!(fast < slow);
        assert_eq!(results[1].growth_rate, 3.0);
    }

    #[test]
    fn labels_tiers() {
        let config = SweepConfig {
            leverage_options: vec![10, 30, 75],
            ..SweepConfig::default()
        };
        let tiers: Vec<LeverageTier> = sweep_leverage(&config)
            .unwrap()
            .iter()
            .map(|r| r.tier)
            .collect();
        assert_eq!(
            tiers,
            vec![
                LeverageTier::Conservative,
                LeverageTier::Elevated,
                LeverageTier::Aggressive
            ]
        );
    }

    #[test]
    fn optional_simulation_uses_candidate_leverage() {
        let config = SweepConfig {
            leverage_options: vec![3, 10],
            simulation: Some(SimulationParameters::default()),
            ..SweepConfig::default()
        };
        let results = sweep_leverage(&config).unwrap();
        for r in &results {
            let sim = r.simulation.as_ref().unwrap();
            assert!(sim.steps[0].leverage <= r.leverage);
        }
        // 3x * 2% never reaches a 15% trigger.
        assert!(results[0].simulation.as_ref().unwrap().add_ons.is_empty());
    }

    #[test]
    fn rejects_out_of_range_candidates() {
        let config = SweepConfig {
            leverage_options: vec![10, 0],
            ..SweepConfig::default()
        };
        assert!(sweep_leverage(&config).is_err());

        let config = SweepConfig {
            leverage_options: vec![],
            ..SweepConfig::default()
        };
        assert_eq!(
            sweep_leverage(&config),
            Err(ConfigurationError::NoLeverageOptions)
        );
    }
}
