use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use fundme_oracle::{to_usd, PriceFeed};
use fundme_types::{Address, Amount, Timestamp};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::events::{EventRecord, LedgerEvent, Payout, Transition};
use crate::phase::{current_phase, FundingPhase};

/// Crowdfunding ledger gated by a deadline and a USD target.
///
/// Owner, deadline and price feed are fixed at construction. Balances only
/// change through [`fund`](Self::fund), [`withdraw_by_owner`](Self::withdraw_by_owner)
/// and [`refund`](Self::refund). Each operation runs every check before it
/// touches state, so a rejected call leaves the ledger exactly as it was.
pub struct FundingLedger {
    owner: Address,
    created_at: Timestamp,
    lock_duration: u64,
    deadline: Timestamp,
    price_feed: Arc<dyn PriceFeed>,
    config: LedgerConfig,
    funder_to_amount: HashMap<Address, Amount>,
    held: Amount,
    events: Vec<EventRecord>,
}

/// Serializable view of a ledger for tooling output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub owner: Address,
    pub data_feed: Address,
    pub created_at: Timestamp,
    pub deadline: Timestamp,
    pub lock_duration: u64,
    pub held: Amount,
    pub total_funded: Amount,
    pub funders: BTreeMap<Address, Amount>,
    pub config: LedgerConfig,
    pub event_count: u64,
}

impl FundingLedger {
    /// Create a ledger whose window closes `lock_duration` seconds after `now`.
    pub fn new(
        owner: Address,
        lock_duration: u64,
        price_feed: Arc<dyn PriceFeed>,
        config: LedgerConfig,
        now: Timestamp,
    ) -> Result<Self, LedgerError> {
        config.validate()?;
        let deadline = now.plus(lock_duration);
        info!(
            owner = %owner,
            data_feed = %price_feed.address(),
            %deadline,
            lock_duration,
            "funding ledger created"
        );
        Ok(Self {
            owner,
            created_at: now,
            lock_duration,
            deadline,
            price_feed,
            config,
            funder_to_amount: HashMap::new(),
            held: Amount::ZERO,
            events: Vec::new(),
        })
    }

    // ---- Operations ----

    /// Contribute `amount` on behalf of `caller`.
    ///
    /// Returns the transition carrying the `Funded` event; the caller's new
    /// cumulative balance is available through [`Self::funder_to_amount`].
    pub fn fund(
        &mut self,
        caller: Address,
        amount: Amount,
        now: Timestamp,
    ) -> Result<Transition, LedgerError> {
        self.check_fund(caller, amount, now)
            .inspect_err(|err| debug!(caller = %caller, %amount, %err, "fund rejected"))?;

        let updated = self
            .funder_to_amount(&caller)
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        let held = self
            .held
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow)?;

        self.funder_to_amount.insert(caller, updated);
        self.held = held;
        info!(funder = %caller, %amount, balance = %updated, "fund accepted");

        let record = self.record(
            now,
            LedgerEvent::Funded {
                funder: caller,
                amount,
            },
        );
        Ok(Transition {
            record,
            payout: None,
        })
    }

    /// Owner-only withdrawal of everything held, once the window has closed
    /// with the target met. Also known as `getFund`.
    pub fn withdraw_by_owner(
        &mut self,
        caller: Address,
        now: Timestamp,
    ) -> Result<Transition, LedgerError> {
        self.check_withdraw(caller, now)
            .inspect_err(|err| debug!(caller = %caller, %err, "owner withdrawal rejected"))?;

        let amount = self.held;
        self.funder_to_amount.clear();
        self.held = Amount::ZERO;
        info!(owner = %self.owner, %amount, "funds withdrawn by owner");

        let record = self.record(now, LedgerEvent::FundWithdrawByOwner { amount });
        Ok(Transition {
            record,
            payout: Some(Payout {
                to: self.owner,
                amount,
            }),
        })
    }

    /// Alias of [`Self::withdraw_by_owner`].
    pub fn get_fund(&mut self, caller: Address, now: Timestamp) -> Result<Transition, LedgerError> {
        self.withdraw_by_owner(caller, now)
    }

    /// Return the caller's whole contribution, once the window has closed
    /// with the target missed.
    pub fn refund(&mut self, caller: Address, now: Timestamp) -> Result<Transition, LedgerError> {
        let (amount, held) = self
            .check_refund(caller, now)
            .inspect_err(|err| debug!(caller = %caller, %err, "refund rejected"))?;

        self.funder_to_amount.remove(&caller);
        self.held = held;
        info!(funder = %caller, %amount, "refund paid");

        let record = self.record(
            now,
            LedgerEvent::RefundByFunder {
                funder: caller,
                amount,
            },
        );
        Ok(Transition {
            record,
            payout: Some(Payout { to: caller, amount }),
        })
    }

    // ---- Read accessors ----

    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Address of the injected price feed.
    pub fn data_feed(&self) -> Address {
        self.price_feed.address()
    }

    pub fn price_feed(&self) -> &Arc<dyn PriceFeed> {
        &self.price_feed
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn deadline(&self) -> Timestamp {
        self.deadline
    }

    pub fn lock_duration(&self) -> u64 {
        self.lock_duration
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Recorded contribution of `funder`; zero when none.
    pub fn funder_to_amount(&self, funder: &Address) -> Amount {
        self.funder_to_amount
            .get(funder)
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// Funders with a nonzero balance, in address order.
    pub fn funders(&self) -> BTreeMap<Address, Amount> {
        self.funder_to_amount
            .iter()
            .map(|(addr, amount)| (*addr, *amount))
            .collect()
    }

    /// Sum of all recorded contributions.
    pub fn total_funded(&self) -> Amount {
        self.funder_to_amount.values().sum()
    }

    /// Native balance held by the ledger.
    pub fn held(&self) -> Amount {
        self.held
    }

    /// The event log, oldest first.
    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    /// Current phase, valued against the live price feed once closed.
    pub fn phase(&self, now: Timestamp) -> Result<FundingPhase, LedgerError> {
        if now < self.deadline {
            return Ok(FundingPhase::Open);
        }
        let total_usd = to_usd(self.total_funded(), self.price_feed.as_ref())?;
        Ok(current_phase(
            now,
            self.deadline,
            total_usd,
            self.config.target(),
        ))
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            owner: self.owner,
            data_feed: self.data_feed(),
            created_at: self.created_at,
            deadline: self.deadline,
            lock_duration: self.lock_duration,
            held: self.held,
            total_funded: self.total_funded(),
            funders: self.funders(),
            config: self.config.clone(),
            event_count: self.events.len() as u64,
        }
    }

    // ---- Checks (no mutation) ----

    fn check_fund(&self, caller: Address, amount: Amount, now: Timestamp) -> Result<(), LedgerError> {
        if now >= self.deadline {
            return Err(LedgerError::WindowClosed);
        }
        let value = to_usd(amount, self.price_feed.as_ref())?;
        if value < self.config.minimum() {
            return Err(LedgerError::InsufficientAmount);
        }
        debug!(caller = %caller, usd = %value, "contribution meets minimum");
        Ok(())
    }

    fn check_withdraw(&self, caller: Address, now: Timestamp) -> Result<(), LedgerError> {
        if caller != self.owner {
            return Err(LedgerError::NotOwner);
        }
        match self.closed_phase(now)? {
            FundingPhase::ClosedTargetReached => Ok(()),
            _ => Err(LedgerError::TargetNotReached),
        }
    }

    fn check_refund(&self, caller: Address, now: Timestamp) -> Result<(Amount, Amount), LedgerError> {
        if self.closed_phase(now)? == FundingPhase::ClosedTargetReached {
            return Err(LedgerError::TargetReached);
        }
        let amount = self.funder_to_amount(&caller);
        if amount.is_zero() {
            return Err(LedgerError::NoFundsForCaller);
        }
        let held = self
            .held
            .checked_sub(amount)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        Ok((amount, held))
    }

    /// Phase for the post-deadline operations; `WindowNotClosed` while open.
    fn closed_phase(&self, now: Timestamp) -> Result<FundingPhase, LedgerError> {
        match self.phase(now)? {
            FundingPhase::Open => Err(LedgerError::WindowNotClosed),
            closed => Ok(closed),
        }
    }

    fn record(&mut self, at: Timestamp, event: LedgerEvent) -> EventRecord {
        let record = EventRecord {
            seq: self.events.len() as u64 + 1,
            at,
            event,
        };
        self.events.push(record.clone());
        record
    }
}

impl fmt::Debug for FundingLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FundingLedger")
            .field("owner", &self.owner)
            .field("data_feed", &self.data_feed())
            .field("deadline", &self.deadline)
            .field("held", &self.held)
            .field("funders", &self.funder_to_amount.len())
            .finish()
    }
}
