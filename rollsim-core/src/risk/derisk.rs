/// Leverage de-risk policy
///
/// **Core Rule:** Leverage may fall, never rise.
///
/// Tiers are kept sorted ascending by capital multiple. Walking them in that
/// order and keeping the last qualifying ceiling yields the tightest ceiling
/// the current capital has earned.
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// One row of the de-risk table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeRiskTier {
    /// Capital must reach `initial_margin * capital_multiple`.
    pub capital_multiple: f64,
    /// Leverage ceiling adopted once the tier is reached.
    pub max_leverage: u32,
}

impl DeRiskTier {
    pub fn new(capital_multiple: f64, max_leverage: u32) -> Self {
        Self {
            capital_multiple,
            max_leverage,
        }
    }
}

/// Ordered `(capital multiple, leverage ceiling)` table.
///
/// The ascending order is an invariant of the type: constructors and
/// deserialization reject unsorted input rather than sorting it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<DeRiskTier>", into = "Vec<DeRiskTier>")]
pub struct LeverageDeRiskPolicy {
    tiers: Vec<DeRiskTier>,
}

impl LeverageDeRiskPolicy {
    /// Build a policy from tiers already sorted by capital multiple.
    pub fn new(tiers: Vec<DeRiskTier>) -> Result<Self, ConfigurationError> {
        let policy = Self { tiers };
        policy.validate()?;
        Ok(policy)
    }

    /// A policy that never changes leverage.
    pub fn none() -> Self {
        Self { tiers: Vec::new() }
    }

    pub fn tiers(&self) -> &[DeRiskTier] {
        &self.tiers
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigurationError> {
        for (index, tier) in self.tiers.iter().enumerate() {
            if !(tier.capital_multiple.is_finite() && tier.capital_multiple > 0.0) {
                return Err(ConfigurationError::InvalidDeRiskTier {
                    index,
                    reason: "capital multiple must be positive and finite",
                });
            }
            if tier.max_leverage < 1 {
                return Err(ConfigurationError::InvalidDeRiskTier {
                    index,
                    reason: "leverage ceiling must be at least 1",
                });
            }
            if index > 0 && tier.capital_multiple < self.tiers[index - 1].capital_multiple {
                return Err(ConfigurationError::UnsortedDeRiskTable { index });
            }
        }
        Ok(())
    }
}

impl Default for LeverageDeRiskPolicy {
    /// 3x capital caps leverage at 5, 5x caps at 3, 10x caps at 1.
    fn default() -> Self {
        Self {
            tiers: vec![
                DeRiskTier::new(3.0, 5),
                DeRiskTier::new(5.0, 3),
                DeRiskTier::new(10.0, 1),
            ],
        }
    }
}

impl TryFrom<Vec<DeRiskTier>> for LeverageDeRiskPolicy {
    type Error = ConfigurationError;

    fn try_from(tiers: Vec<DeRiskTier>) -> Result<Self, Self::Error> {
        Self::new(tiers)
    }
}

impl From<LeverageDeRiskPolicy> for Vec<DeRiskTier> {
    fn from(policy: LeverageDeRiskPolicy) -> Self {
        policy.tiers
    }
}

/// Leverage to run at, given current capital.
///
/// A tier applies when `capital >= initial_margin * capital_multiple` and the
/// leverage so far exceeds its ceiling. Qualifying tiers are applied in
/// ascending order, so the result never exceeds `current_leverage`.
pub fn next_leverage(
    capital: f64,
    initial_margin: f64,
    current_leverage: u32,
    policy: &LeverageDeRiskPolicy,
) -> u32 {
    let mut leverage = current_leverage;
    for tier in &policy.tiers {
        if capital >= initial_margin * tier.capital_multiple && leverage > tier.max_leverage {
            leverage = tier.max_leverage;
        }
    }
    leverage
}
