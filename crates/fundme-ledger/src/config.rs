use fundme_oracle::usd;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// USD thresholds that gate contributions and the owner withdrawal.
///
/// Values are whole dollars; conversions to 18-decimal USD happen at check
/// time against the live price feed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Smallest single contribution accepted by `fund`.
    pub minimum_usd: u64,
    /// Total that must be raised for the owner to withdraw instead of
    /// funders being refunded.
    pub target_usd: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            minimum_usd: 100,
            target_usd: 1000,
        }
    }
}

impl LedgerConfig {
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.minimum_usd == 0 {
            return Err(LedgerError::InvalidConfig(
                "minimum_usd must be greater than zero".into(),
            ));
        }
        if self.target_usd < self.minimum_usd {
            return Err(LedgerError::InvalidConfig(format!(
                "target_usd ({}) must not be below minimum_usd ({})",
                self.target_usd, self.minimum_usd
            )));
        }
        Ok(())
    }

    /// Minimum contribution in 18-decimal USD.
    pub fn minimum(&self) -> u128 {
        usd(self.minimum_usd)
    }

    /// Funding target in 18-decimal USD.
    pub fn target(&self) -> u128 {
        usd(self.target_usd)
    }
}
