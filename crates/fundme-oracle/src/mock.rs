use std::sync::RwLock;

use fundme_types::{Address, Timestamp};
use tracing::debug;

use crate::error::{OracleError, OracleResult};
use crate::feed::{PriceFeed, RoundData};

/// Decimals of the development ETH/USD feed.
pub const DECIMALS: u8 = 8;

/// Opening answer of the development feed: 3000 USD per ETH.
pub const INITIAL_ANSWER: i128 = 3000 * 10i128.pow(DECIMALS as u32);

/// In-memory aggregator for development networks and tests.
///
/// Answers are set explicitly with [`MockV3Aggregator::update_answer`];
/// every update opens a new round. The feed can be switched offline to
/// exercise oracle failures.
pub struct MockV3Aggregator {
    address: Address,
    decimals: u8,
    inner: RwLock<MockState>,
}

struct MockState {
    rounds: Vec<RoundData>,
    unavailable: bool,
}

impl MockV3Aggregator {
    pub fn new(address: Address, decimals: u8, initial_answer: i128, at: Timestamp) -> Self {
        let first = RoundData {
            round_id: 1,
            answer: initial_answer,
            started_at: at,
            updated_at: at,
        };
        Self {
            address,
            decimals,
            inner: RwLock::new(MockState {
                rounds: vec![first],
                unavailable: false,
            }),
        }
    }

    /// Publish a new answer as the next round.
    pub fn update_answer(&self, answer: i128, at: Timestamp) -> OracleResult<RoundData> {
        let mut state = self.inner.write().map_err(|_| self.unavailable())?;
        let round_id = state.rounds.len() as u64 + 1;
        let round = RoundData {
            round_id,
            answer,
            started_at: at,
            updated_at: at,
        };
        state.rounds.push(round);
        debug!(feed = %self.address, round_id, answer = %answer, "mock feed answer updated");
        Ok(round)
    }

    /// Take the feed offline (or bring it back).
    pub fn set_unavailable(&self, unavailable: bool) -> OracleResult<()> {
        let mut state = self.inner.write().map_err(|_| self.unavailable())?;
        state.unavailable = unavailable;
        debug!(feed = %self.address, unavailable, "mock feed availability changed");
        Ok(())
    }

    fn unavailable(&self) -> OracleError {
        OracleError::Unavailable {
            feed: self.address.to_hex(),
        }
    }
}

impl PriceFeed for MockV3Aggregator {
    fn address(&self) -> Address {
        self.address
    }

    fn decimals(&self) -> u8 {
        self.decimals
    }

    fn latest_round_data(&self) -> OracleResult<RoundData> {
        let state = self.inner.read().map_err(|_| self.unavailable())?;
        if state.unavailable {
            return Err(self.unavailable());
        }
        state.rounds.last().copied().ok_or_else(|| self.unavailable())
    }
}
