//! Parameter fingerprinting — deterministic identification of simulation inputs.
//!
//! Two runs with identical parameters (including strategy mode) share a
//! fingerprint, so exported artifacts can be matched back to their inputs.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::SimulationParameters;

/// BLAKE3 hex digest of the canonical JSON encoding of a parameter set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParamsHash(pub String);

impl ParamsHash {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(blake3::hash(bytes).to_hex().to_string())
    }

    /// First 12 hex characters, for directory names and tables.
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }
}

impl fmt::Display for ParamsHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl SimulationParameters {
    /// Struct fields serialize in declaration order, so the JSON is canonical.
    pub fn fingerprint(&self) -> ParamsHash {
        // Plain structs and enums never fail to serialize; Debug is a stable fallback.
        let canonical =
            serde_json::to_vec(self).unwrap_or_else(|_| format!("{self:?}").into_bytes());
        ParamsHash::from_bytes(&canonical)
    }
}
