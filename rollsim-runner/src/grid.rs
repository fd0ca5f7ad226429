//! Liquidation price tables over a price range and leverage candidates.

use rollsim_core::risk::validate_leverage_options;
use rollsim_core::{liquidation_price, ConfigurationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidationRow {
    pub leverage: u32,
    /// One entry per grid price.
    pub liquidation_prices: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidationGrid {
    pub prices: Vec<f64>,
    pub rows: Vec<LiquidationRow>,
}

/// Largest number of prices a grid may hold.
pub const MAX_GRID_POINTS: usize = 10_000;

/// Number of prices in `min, min + step, ...` up to and including `max`.
pub fn price_count(min: f64, max: f64, step: f64) -> Result<usize, ConfigurationError> {
    for (field, value) in [("min_price", min), ("max_price", max), ("price_step", step)] {
        if !(value.is_finite() && value > 0.0) {
            return Err(ConfigurationError::NonPositive { field, value });
        }
    }
    if max < min {
        return Err(ConfigurationError::InvertedRange {
            field: "price",
            min,
            max,
        });
    }

    // Counted in f64 so wide ranges can't overflow usize.
    let count = ((max - min) / step + 1e-9).floor() + 1.0;
    if count > MAX_GRID_POINTS as f64 {
        return Err(ConfigurationError::GridTooLarge {
            count,
            max: MAX_GRID_POINTS,
        });
    }
    Ok(count as usize)
}

/// Prices `min, min + step, ...` up to and including `max`.
pub fn price_range(min: f64, max: f64, step: f64) -> Result<Vec<f64>, ConfigurationError> {
    let count = price_count(min, max, step)?;
    // Index-based so long ranges don't accumulate rounding.
    Ok((0..count).map(|i| min + step * i as f64).collect())
}

pub fn liquidation_grid(
    min: f64,
    max: f64,
    step: f64,
    leverage_options: &[u32],
) -> Result<LiquidationGrid, ConfigurationError> {
    validate_leverage_options(leverage_options)?;
    let prices = price_range(min, max, step)?;
    let rows = leverage_options
        .iter()
        .map(|&leverage| LiquidationRow {
            leverage,
            liquidation_prices: prices
                .iter()
                .map(|&p| liquidation_price(p, leverage))
                .collect(),
        })
        .collect();
    Ok(LiquidationGrid { prices, rows })
}
