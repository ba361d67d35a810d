use fundme_types::{Address, Amount, Timestamp};

use crate::error::LedgerError;
use crate::events::{EventRecord, Transition};
use crate::ledger::LedgerSnapshot;
use crate::phase::FundingPhase;

/// Write boundary: the three state-changing ledger operations.
///
/// `now` is supplied by the host and must not decrease between calls.
pub trait FundingWriter: Send + Sync {
    fn fund(&self, caller: Address, amount: Amount, now: Timestamp)
        -> Result<Transition, LedgerError>;

    fn withdraw_by_owner(&self, caller: Address, now: Timestamp) -> Result<Transition, LedgerError>;

    fn refund(&self, caller: Address, now: Timestamp) -> Result<Transition, LedgerError>;

    fn get_fund(&self, caller: Address, now: Timestamp) -> Result<Transition, LedgerError> {
        self.withdraw_by_owner(caller, now)
    }
}

/// Read boundary for accessors and tooling.
pub trait FundingReader: Send + Sync {
    fn owner(&self) -> Result<Address, LedgerError>;

    fn data_feed(&self) -> Result<Address, LedgerError>;

    fn deadline(&self) -> Result<Timestamp, LedgerError>;

    fn funder_to_amount(&self, funder: &Address) -> Result<Amount, LedgerError>;

    fn held(&self) -> Result<Amount, LedgerError>;

    fn total_funded(&self) -> Result<Amount, LedgerError>;

    fn phase(&self, now: Timestamp) -> Result<FundingPhase, LedgerError>;

    /// Events with `seq` strictly greater than `after`.
    fn events_since(&self, after: u64) -> Result<Vec<EventRecord>, LedgerError>;

    fn snapshot(&self) -> Result<LedgerSnapshot, LedgerError>;
}
