use std::fmt;

use fundme_types::Timestamp;
use serde::{Deserialize, Serialize};

/// Where a ledger stands relative to its deadline and target.
///
/// Never stored: derived from the clock and the live USD valuation each
/// time it is needed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FundingPhase {
    /// Before the deadline; only `fund` is accepted.
    Open,
    /// Deadline passed and target met; only the owner withdrawal is accepted.
    ClosedTargetReached,
    /// Deadline passed and target missed; only refunds are accepted.
    ClosedTargetNotReached,
}

impl FundingPhase {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }
}

impl fmt::Display for FundingPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Open => "open",
            Self::ClosedTargetReached => "closed (target reached)",
            Self::ClosedTargetNotReached => "closed (target not reached)",
        };
        write!(f, "{s}")
    }
}

/// Derive the phase from the clock and the funded total in USD.
pub fn current_phase(
    now: Timestamp,
    deadline: Timestamp,
    total_usd: u128,
    target_usd: u128,
) -> FundingPhase {
    if now < deadline {
        FundingPhase::Open
    } else if total_usd >= target_usd {
        FundingPhase::ClosedTargetReached
    } else {
        FundingPhase::ClosedTargetNotReached
    }
}
