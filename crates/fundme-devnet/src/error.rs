use fundme_ledger::LedgerError;
use fundme_types::{Address, Amount};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DevnetError {
    /// The contract rejected the call.
    #[error("reverted: {0}")]
    Reverted(#[from] LedgerError),

    #[error("unknown network: {0}")]
    UnknownNetwork(String),

    #[error("mock contracts are only deployed on development networks, not {0}")]
    MockOnLiveNetwork(String),

    #[error("network {network} has no ETH/USD data feed configured")]
    MissingFeed { network: String },

    #[error("network {network} is live (data feed {feed}); no RPC transport is available")]
    LiveNetworkUnsupported { network: String, feed: Address },

    #[error("no contract deployed at {0}")]
    UnknownContract(Address),

    #[error("no price feed deployed at {0}")]
    UnknownFeed(Address),

    #[error("deployment not found: {0}")]
    DeploymentNotFound(String),

    #[error("account {account} has {available}, needs {needed}")]
    InsufficientBalance {
        account: Address,
        needed: Amount,
        available: Amount,
    },

    #[error("account {account} cannot receive {amount}: balance would overflow")]
    BalanceOverflow { account: Address, amount: Amount },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DevnetError {
    /// The revert reason when the contract rejected the call.
    pub fn revert_reason(&self) -> Option<String> {
        match self {
            Self::Reverted(err) => Some(err.to_string()),
            _ => None,
        }
    }
}

pub type DevnetResult<T> = Result<T, DevnetError>;
