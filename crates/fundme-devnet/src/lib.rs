//! In-process development chain for FundMe.
//!
//! Stands in for a local development node: prefunded named accounts, a
//! controllable clock, the mock price-feed and FundMe deployment fixtures,
//! network configuration, and a broadcast stream of emitted events. This is
//! the main entry point for tooling and end-to-end tests.

pub mod chain;
pub mod config;
pub mod deployment;
pub mod error;

pub use chain::{CallReceipt, ChainEvent, DevChain};
pub use config::{HarnessConfig, NetworkEntry, NetworkProfile, DEV_CHAIN_ID, SEPOLIA_CHAIN_ID};
pub use deployment::{Deployment, DeploymentSet, FUND_ME, MOCK_V3_AGGREGATOR};
pub use error::{DevnetError, DevnetResult};

// Re-export key types
pub use fundme_ledger::{FundingPhase, LedgerConfig, LedgerError, LedgerEvent};
pub use fundme_types::{Address, Amount, Timestamp};
