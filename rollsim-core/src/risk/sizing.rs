use crate::domain::MarginMode;

/// Position size implied by capital, leverage and price.
///
/// - `Base`: `capital * leverage / price` units of the asset
/// - `Quote`: `capital * leverage` in the capital unit
///
/// The simulator never adjusts a position incrementally; it calls this after
/// every change to capital, leverage or price.
pub fn position_size(capital: f64, leverage: u32, price: f64, margin_mode: MarginMode) -> f64 {
    let notional = capital * f64::from(leverage);
    match margin_mode {
        MarginMode::Base => notional / price,
        MarginMode::Quote => notional,
    }
}
