use fundme_types::{Address, Amount, Timestamp};
use serde::{Deserialize, Serialize};

/// Observable effect of a committed ledger call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum LedgerEvent {
    /// A contribution was accepted.
    Funded { funder: Address, amount: Amount },
    /// The owner drained the ledger; `amount` is the balance just before.
    FundWithdrawByOwner { amount: Amount },
    /// A funder took back their whole contribution.
    RefundByFunder { funder: Address, amount: Amount },
}

impl LedgerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Funded { .. } => "Funded",
            Self::FundWithdrawByOwner { .. } => "FundWithdrawByOwner",
            Self::RefundByFunder { .. } => "RefundByFunder",
        }
    }
}

/// An event as recorded in the ledger's log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Position in the log, starting at 1.
    pub seq: u64,
    pub at: Timestamp,
    #[serde(flatten)]
    pub event: LedgerEvent,
}

/// Native funds leaving the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub to: Address,
    pub amount: Amount,
}

/// Result of a committed call: the recorded event and any outgoing transfer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub record: EventRecord,
    pub payout: Option<Payout>,
}
