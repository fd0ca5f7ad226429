//! Configuration errors raised before a simulation or projection starts.

use thiserror::Error;

/// A parameter was out of range or non-positive.
///
/// Always surfaced synchronously, before the first step runs. Degenerate but
/// valid inputs (leverage 1, zero growth) are not errors; they come back as
/// warnings on the result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("{field} must be positive and finite, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("{field} must be at least 1, got {value}")]
    LeverageBelowOne { field: &'static str, value: u32 },

    #[error("{field} must be at most {max}, got {value}")]
    LeverageAboveMax {
        field: &'static str,
        max: u32,
        value: u32,
    },

    #[error("{field} range is inverted: {min} > {max}")]
    InvertedRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("no leverage options given")]
    NoLeverageOptions,

    #[error("{field} must lie in {range}, got {value}")]
    FractionOutOfRange {
        field: &'static str,
        range: &'static str,
        value: f64,
    },

    #[error("de-risk tier {index} breaks ascending capital-multiple order")]
    UnsortedDeRiskTable { index: usize },

    #[error("de-risk tier {index} is invalid: {reason}")]
    InvalidDeRiskTier { index: usize, reason: &'static str },

    #[error("{field} must be at least 1")]
    ZeroCap { field: &'static str },

    #[error("explicit price path is empty")]
    EmptyPricePath,

    #[error("price path entry {index} must be positive and finite, got {value}")]
    InvalidPathPrice { index: usize, value: f64 },

    #[error("price grid would hold {count} points (max {max})")]
    GridTooLarge { count: f64, max: usize },
}

// ─── Validation helpers ──────────────────────────────────────────────

pub(crate) fn require_positive(field: &'static str, value: f64) -> Result<(), ConfigurationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigurationError::NonPositive { field, value })
    }
}

/// Accepts `value` in `[0, 1]`.
pub(crate) fn require_unit_closed(
    field: &'static str,
    value: f64,
) -> Result<(), ConfigurationError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigurationError::FractionOutOfRange {
            field,
            range: "[0, 1]",
            value,
        })
    }
}

/// Accepts `value` in `(0, 1]`.
pub(crate) fn require_unit_open_closed(
    field: &'static str,
    value: f64,
) -> Result<(), ConfigurationError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigurationError::FractionOutOfRange {
            field,
            range: "(0, 1]",
            value,
        })
    }
}

/// Accepts `value` in `(0, 1)`.
pub(crate) fn require_unit_open(field: &'static str, value: f64) -> Result<(), ConfigurationError> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(ConfigurationError::FractionOutOfRange {
            field,
            range: "(0, 1)",
            value,
        })
    }
}

pub(crate) fn require_leverage(field: &'static str, value: u32) -> Result<(), ConfigurationError> {
    if value >= 1 {
        Ok(())
    } else {
        Err(ConfigurationError::LeverageBelowOne { field, value })
    }
}
