//! Funding ledger for FundMe.
//!
//! This crate is the heart of FundMe. It provides:
//! - [`FundingLedger`], the owned aggregate holding per-funder balances, the
//!   funding deadline, the owner and the injected price feed
//! - the three gated operations: `fund`, `withdraw_by_owner` and `refund`
//! - [`current_phase`], the window/target phase derived fresh on every call
//! - [`SharedLedger`], a lock-guarded wrapper for multi-threaded hosts
//! - [`ConservationAuditor`], which checks the balance invariants

pub mod config;
pub mod error;
pub mod events;
pub mod ledger;
pub mod phase;
pub mod shared;
pub mod traits;
pub mod validation;

pub use config::LedgerConfig;
pub use error::LedgerError;
pub use events::{EventRecord, LedgerEvent, Payout, Transition};
pub use ledger::{FundingLedger, LedgerSnapshot};
pub use phase::{current_phase, FundingPhase};
pub use shared::SharedLedger;
pub use traits::{FundingReader, FundingWriter};
pub use validation::{ConservationAuditor, ValidationReport, Violation, ViolationKind};
