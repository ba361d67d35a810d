//! Foundation types for FundMe.
//!
//! Every other FundMe crate depends on `fundme-types`.
//!
//! # Key Types
//!
//! - [`Address`] — 20-byte account or contract identity
//! - [`Amount`] — native-currency amount in wei (18 decimals)
//! - [`Timestamp`] — unix-seconds point in time used for window checks

pub mod amount;
pub mod error;
pub mod identity;
pub mod temporal;

pub use amount::{Amount, NATIVE_DECIMALS, WEI_PER_ETHER};
pub use error::TypeError;
pub use identity::Address;
pub use temporal::Timestamp;
