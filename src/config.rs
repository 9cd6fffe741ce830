use serde::Deserialize;

use crate::types::Address;

pub use toml::de::Error as TomlError;

/// Challenge period in clock ticks, roughly 24h of blocks.
pub const DEFAULT_CHALLENGE_PERIOD: u64 = 144;

/// How far past the current clock a new channel's timeout must lie.
pub const DEFAULT_MIN_TIMEOUT_HORIZON: u64 = 100;

/// Parameters fixed for the lifetime of an [crate::Adjudicator].
#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(default)]
pub struct AdjudicatorConfig {
    /// Copied into every channel at creation, immutable afterwards.
    pub challenge_period: u64,
    pub min_timeout_horizon: u64,
    /// Ledger account holding deposited collateral.
    pub custody: Address,
}

impl Default for AdjudicatorConfig {
    fn default() -> Self {
        Self {
            challenge_period: DEFAULT_CHALLENGE_PERIOD,
            min_timeout_horizon: DEFAULT_MIN_TIMEOUT_HORIZON,
            custody: Address::default(),
        }
    }
}

impl AdjudicatorConfig {
    pub fn with_custody(custody: Address) -> Self {
        Self {
            custody,
            ..Self::default()
        }
    }

    /// Instead of relying on the `toml` crate directly, use this method instead.
    pub fn try_toml(toml: &str) -> Result<Self, TomlError> {
        toml::from_str(toml)
    }
}
