//! Scenario tests for the rolling position simulator and growth projector.

use rollsim_core::{
    liquidation_price, position_size, run_growth_projection, run_rolling_simulation,
    LeverageDeRiskPolicy, MarginMode, PricePath, SimulationParameters, SimulationWarning,
    StrategyMode, Termination, DEFAULT_MAX_ROUNDS,
};

fn scenario_params() -> SimulationParameters {
    SimulationParameters {
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
        ..SimulationParameters::default()
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

// ── Scenario 1: floating-profit reaches target ───────────────────────

#[test]
fn floating_profit_reaches_target() {
    let out = run_rolling_simulation(&scenario_params(), StrategyMode::FloatingProfit).unwrap();

    assert_eq!(out.termination, Termination::ReachedTarget);
    assert!(out.summary.final_capital >= 100.0);
    assert!(out.summary.add_on_count >= 1);
    assert_eq!(out.summary.add_on_count, out.add_ons.len());
    assert!(out.summary.final_price >= 200.0);
    // 1.02^35 < 2 <= 1.02^36
    assert_eq!(out.steps.len(), 36);
}

#[test]
fn floating_profit_de_risks_after_tripling() {
    let out = run_rolling_simulation(&scenario_params(), StrategyMode::FloatingProfit).unwrap();

    // Ten 12% add-ons take capital past 3x, which caps leverage at 5.
    assert_eq!(out.summary.final_leverage, 5);
    assert_eq!(out.add_ons.len(), 10);
    let first_capped = out.steps.iter().position(|s| s.leverage == 5).unwrap();
    assert!(out.steps[first_capped].capital >= 300.0);
    assert!(out.steps[..first_capped].iter().all(|s| s.leverage == 10));
}

#[test]
fn floating_profit_capital_never_resets() {
    let out = run_rolling_simulation(&scenario_params(), StrategyMode::FloatingProfit).unwrap();
    for pair in out.add_ons.windows(2) {
        assert!(pair[1].capital >= pair[0].capital);
    }
}

// ── Scenario 2: rolling-reset ────────────────────────────────────────

#[test]
fn rolling_reset_capital_is_margin_plus_reserve() {
    let out = run_rolling_simulation(&scenario_params(), StrategyMode::RollingReset).unwrap();
    let last_add_on = out.add_ons.last().unwrap();
    let record = out.steps.iter().find(|s| s.step == last_add_on.step).unwrap();

    assert_eq!(
        round2(last_add_on.capital),
        round2(100.0 + record.reserve_total)
    );
    assert_eq!(
        round2(out.summary.final_capital),
        round2(100.0 + out.summary.reserve_total)
    );
}

#[test]
fn rolling_reset_compounds_slower_than_floating() {
    let params = scenario_params();
    let floating = run_rolling_simulation(&params, StrategyMode::FloatingProfit).unwrap();
    let rolling = run_rolling_simulation(&params, StrategyMode::RollingReset).unwrap();

    assert!(rolling.steps[0].capital < floating.steps[0].capital);
    // Reset mode grows 3% per add-on and never reaches the first de-risk tier.
    assert_eq!(rolling.summary.final_leverage, 10);
    assert_eq!(rolling.add_ons.len(), rolling.steps.len());
}

// ── Scenario 4: leverage 1 ───────────────────────────────────────────

#[test]
fn leverage_one_has_zero_liquidation_price() {
    assert_eq!(liquidation_price(100.0, 1), 0.0);

    let params = SimulationParameters {
        initial_leverage: 1,
        ..scenario_params()
    };
    let out = run_rolling_simulation(&params, StrategyMode::FloatingProfit).unwrap();
    assert_eq!(out.summary.final_liquidation_price, 0.0);
    assert!(out.has_warning(SimulationWarning::ZeroLiquidationPrice));
}

#[test]
fn de_risk_to_one_flags_zero_liquidation() {
    let params = SimulationParameters {
        target_price: 1_000.0,
        reserve_fraction: 0.0,
        add_on_allocation: 1.0,
        derisk: LeverageDeRiskPolicy::new(vec![rollsim_core::DeRiskTier::new(1.5, 1)]).unwrap(),
        ..scenario_params()
    };
    let out = run_rolling_simulation(&params, StrategyMode::FloatingProfit).unwrap();
    assert_eq!(out.summary.final_leverage, 1);
    assert!(out.has_warning(SimulationWarning::ZeroLiquidationPrice));
    let first_unlevered = out.steps.iter().find(|s| s.leverage == 1).unwrap();
    assert_eq!(first_unlevered.liquidation_price, 0.0);
}

// ── Drawdown stop ────────────────────────────────────────────────────

#[test]
fn drawdown_stop_drops_breaching_step() {
    let params = SimulationParameters {
        price_path: PricePath::Explicit {
            prices: vec![110.0, 120.0, 100.0, 150.0, 210.0],
        },
        ..scenario_params()
    };
    let out = run_rolling_simulation(&params, StrategyMode::FloatingProfit).unwrap();

    assert_eq!(out.termination, Termination::StoppedByDrawdown);
    assert_eq!(out.steps.len(), 2);
    assert_eq!(out.steps.last().unwrap().price, 120.0);
    assert_eq!(out.summary.final_price, 100.0);
    assert_eq!(out.summary.peak_price, 120.0);
}

#[test]
fn shallow_pullback_keeps_running() {
    let params = SimulationParameters {
        price_path: PricePath::Explicit {
            prices: vec![110.0, 120.0, 110.0, 150.0, 210.0],
        },
        ..scenario_params()
    };
    let out = run_rolling_simulation(&params, StrategyMode::FloatingProfit).unwrap();

    assert_eq!(out.termination, Termination::ReachedTarget);
    assert_eq!(out.steps.len(), 5);
    // The pullback step shows a loss, so it can't fire an add-on.
    assert!(out.add_ons.iter().all(|a| a.step != 3));
}

// ── Base-denominated margin ──────────────────────────────────────────

#[test]
fn base_mode_position_is_in_asset_units() {
    let params = SimulationParameters {
        margin_mode: MarginMode::Base,
        ..scenario_params()
    };
    let out = run_rolling_simulation(&params, StrategyMode::FloatingProfit).unwrap();
    assert_eq!(out.termination, Termination::ReachedTarget);
    for s in &out.steps {
        let expected = position_size(s.capital, s.leverage, s.price, MarginMode::Base);
        assert!((s.position - expected).abs() <= 1e-9 * expected.abs());
    }
    let s = &out.summary;
    let expected_floating = s.final_position * s.price_change_fraction * s.final_price;
    assert!((s.floating_profit - expected_floating).abs() < 1e-6);
}

// ── Idempotence ──────────────────────────────────────────────────────

#[test]
fn identical_parameters_give_identical_outcomes() {
    let params = scenario_params();
    for mode in StrategyMode::ALL {
        let a = run_rolling_simulation(&params, mode).unwrap();
        let b = run_rolling_simulation(&params, mode).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn fingerprint_includes_mode() {
    let params = scenario_params();
    let a = run_rolling_simulation(&params, StrategyMode::FloatingProfit).unwrap();
    let b = run_rolling_simulation(&params, StrategyMode::RollingReset).unwrap();
    assert_ne!(a.fingerprint, b.fingerprint);
}

// ── Configuration errors ─────────────────────────────────────────────

#[test]
fn invalid_parameters_are_rejected_before_running() {
    let cases = [
        SimulationParameters {
            initial_leverage: 0,
            ..scenario_params()
        },
        SimulationParameters {
            start_price: -1.0,
            ..scenario_params()
        },
        SimulationParameters {
            initial_margin: 0.0,
            ..scenario_params()
        },
        SimulationParameters {
            add_on_allocation: 1.5,
            ..scenario_params()
        },
        SimulationParameters {
            drawdown_stop: 0.0,
            ..scenario_params()
        },
    ];
    for params in cases {
        assert!(run_rolling_simulation(&params, StrategyMode::FloatingProfit).is_err());
    }
}

// ── Scenario 3: growth projection ────────────────────────────────────

#[test]
fn growth_projection_terminates_one_way_or_the_other() {
    let p = run_growth_projection(100.0, 100_000.0, 0.30, DEFAULT_MAX_ROUNDS).unwrap();
    let reached = p.round_count() <= 100 && p.final_capital() >= 100_000.0;
    let capped = p.round_count() == 100 && p.final_capital() < 100_000.0;
    assert!(reached || capped);
    assert!(reached);
}
