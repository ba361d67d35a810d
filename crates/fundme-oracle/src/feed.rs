use fundme_types::{Address, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::OracleResult;

/// One answer published by a price feed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundData {
    pub round_id: u64,
    /// Price of one whole native unit in USD, scaled by the feed's decimals.
    pub answer: i128,
    pub started_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Native-currency to USD exchange-rate source.
///
/// Implementations must be safe to call from any thread at any time; the
/// ledger calls [`PriceFeed::latest_round_data`] on every gated operation
/// and treats any error as a failed call.
pub trait PriceFeed: Send + Sync {
    /// The address the feed is deployed at, exposed by the ledger as its
    /// data feed.
    fn address(&self) -> Address;

    /// Number of decimals in [`RoundData::answer`].
    fn decimals(&self) -> u8;

    /// The most recent round.
    fn latest_round_data(&self) -> OracleResult<RoundData>;
}
