//! Price-feed capability for FundMe.
//!
//! The ledger never talks to a concrete oracle. It holds an
//! `Arc<dyn PriceFeed>` and asks it for the latest native-to-USD answer
//! whenever a minimum-contribution or target check runs. Development
//! networks inject a [`MockV3Aggregator`]; live adapters implement the same
//! trait.

pub mod convert;
pub mod error;
pub mod feed;
pub mod mock;

pub use convert::{to_usd, usd, USD_DECIMALS};
pub use error::{OracleError, OracleResult};
pub use feed::{PriceFeed, RoundData};
pub use mock::{MockV3Aggregator, DECIMALS, INITIAL_ANSWER};
