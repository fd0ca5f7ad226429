//! Leverage risk tiers used to label leverage candidates.

use serde::{Deserialize, Serialize};

use crate::error::{require_leverage, ConfigurationError};

/// Largest leverage offered as a candidate.
pub const MAX_LEVERAGE_OPTION: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeverageTier {
    /// Up to 20x.
    Conservative,
    /// 21x to 50x.
    Elevated,
    /// Above 50x.
    Aggressive,
}

impl LeverageTier {
    pub fn classify(leverage: u32) -> Self {
        match leverage {
            0..=20 => Self::Conservative,
            21..=50 => Self::Elevated,
            _ => Self::Aggressive,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Conservative => "conservative",
            Self::Elevated => "elevated",
            Self::Aggressive => "aggressive",
        }
    }
}

/// Every candidate must lie in `1..=MAX_LEVERAGE_OPTION`.
pub fn validate_leverage_options(options: &[u32]) -> Result<(), ConfigurationError> {
    if options.is_empty() {
        return Err(ConfigurationError::NoLeverageOptions);
    }
    for &leverage in options {
        require_leverage("leverage option", leverage)?;
        if leverage > MAX_LEVERAGE_OPTION {
            return Err(ConfigurationError::LeverageAboveMax {
                field: "leverage option",
                max: MAX_LEVERAGE_OPTION,
                value: leverage,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leverage_options_bounds() {
        assert!(validate_leverage_options(&[1, 10, 100]).is_ok());
        assert_eq!(
            validate_leverage_options(&[]),
            Err(ConfigurationError::NoLeverageOptions)
        );
        assert!(validate_leverage_options(&[0]).is_err());
        assert!(matches!(
            validate_leverage_options(&[10, 101]),
            Err(ConfigurationError::LeverageAboveMax { value: 101, .. })
        ));
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(LeverageTier::classify(1), LeverageTier::Conservative);
        assert_eq!(LeverageTier::classify(20), LeverageTier::Conservative);
        assert_eq!(LeverageTier::classify(21), LeverageTier::Elevated);
        assert_eq!(LeverageTier::classify(50), LeverageTier::Elevated);
        assert_eq!(LeverageTier::classify(51), LeverageTier::Aggressive);
        assert_eq!(LeverageTier::classify(MAX_LEVERAGE_OPTION), LeverageTier::Aggressive);
    }
}
