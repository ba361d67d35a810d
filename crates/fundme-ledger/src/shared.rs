use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use fundme_types::{Address, Amount, Timestamp};

use crate::error::LedgerError;
use crate::events::{EventRecord, Transition};
use crate::ledger::{FundingLedger, LedgerSnapshot};
use crate::phase::FundingPhase;
use crate::traits::{FundingReader, FundingWriter};

/// A [`FundingLedger`] that can be shared between threads.
///
/// Every mutation holds the write lock across its whole check-then-commit
/// sequence, so concurrent calls are serialized and never observe a
/// half-applied transition. Wrap in an `Arc` to share.
pub struct SharedLedger {
    inner: RwLock<FundingLedger>,
}

impl SharedLedger {
    pub fn new(ledger: FundingLedger) -> Self {
        Self {
            inner: RwLock::new(ledger),
        }
    }

    /// Run a closure against the ledger under the read lock.
    pub fn with_ledger<T>(&self, f: impl FnOnce(&FundingLedger) -> T) -> Result<T, LedgerError> {
        Ok(f(&*self.read()?))
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, FundingLedger>, LedgerError> {
        self.inner.read().map_err(|_| LedgerError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, FundingLedger>, LedgerError> {
        self.inner.write().map_err(|_| LedgerError::LockPoisoned)
    }
}

impl From<FundingLedger> for SharedLedger {
    fn from(ledger: FundingLedger) -> Self {
        Self::new(ledger)
    }
}

impl FundingWriter for SharedLedger {
    fn fund(
        &self,
        caller: Address,
        amount: Amount,
        now: Timestamp,
    ) -> Result<Transition, LedgerError> {
        self.write()?.fund(caller, amount, now)
    }

    fn withdraw_by_owner(&self, caller: Address, now: Timestamp) -> Result<Transition, LedgerError> {
        self.write()?.withdraw_by_owner(caller, now)
    }

    fn refund(&self, caller: Address, now: Timestamp) -> Result<Transition, LedgerError> {
        self.write()?.refund(caller, now)
    }
}

impl FundingReader for SharedLedger {
    fn owner(&self) -> Result<Address, LedgerError> {
        Ok(self.read()?.owner())
    }

    fn data_feed(&self) -> Result<Address, LedgerError> {
        Ok(self.read()?.data_feed())
    }

    fn deadline(&self) -> Result<Timestamp, LedgerError> {
        Ok(self.read()?.deadline())
    }

    fn funder_to_amount(&self, funder: &Address) -> Result<Amount, LedgerError> {
        Ok(self.read()?.funder_to_amount(funder))
    }

    fn held(&self) -> Result<Amount, LedgerError> {
        Ok(self.read()?.held())
    }

    fn total_funded(&self) -> Result<Amount, LedgerError> {
        Ok(self.read()?.total_funded())
    }

    fn phase(&self, now: Timestamp) -> Result<FundingPhase, LedgerError> {
        self.read()?.phase(now)
    }

    fn events_since(&self, after: u64) -> Result<Vec<EventRecord>, LedgerError> {
        Ok(self
            .read()?
            .events()
            .iter()
            .filter(|record| record.seq > after)
            .cloned()
            .collect())
    }

    fn snapshot(&self) -> Result<LedgerSnapshot, LedgerError> {
        Ok(self.read()?.snapshot())
    }
}
