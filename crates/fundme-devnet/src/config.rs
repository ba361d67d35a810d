use std::collections::BTreeMap;
use std::path::Path;

use fundme_ledger::LedgerConfig;
use fundme_oracle::{DECIMALS, INITIAL_ANSWER};
use fundme_types::{Address, Amount};
use serde::{Deserialize, Serialize};

use crate::error::{DevnetError, DevnetResult};

/// Chain id of in-process development networks.
pub const DEV_CHAIN_ID: u64 = 31337;

/// Chain id of the Sepolia test network.
pub const SEPOLIA_CHAIN_ID: u64 = 11155111;

const SEPOLIA_ETH_USD_FEED: &str = "0x694AA1769357215DE4FAC081bf1f309aDC325306";

/// Harness configuration: mock feed parameters, lock time, networks, and the
/// ledger thresholds every deployment uses.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Decimals of the mock price feed.
    pub decimals: u8,
    /// Opening answer of the mock price feed.
    pub initial_answer: i64,
    /// Seconds the funding window stays open after deployment.
    pub lock_time: u64,
    /// Confirmations awaited on live networks.
    pub confirmations: u64,
    /// Networks served by the in-process chain with a mock feed.
    pub development_chains: Vec<String>,
    /// Number of prefunded named accounts.
    pub accounts: usize,
    /// Starting balance of each named account.
    pub account_balance: Amount,
    pub networks: BTreeMap<String, NetworkEntry>,
    pub ledger: LedgerConfig,
}

/// One `[networks.<name>]` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkEntry {
    pub chain_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eth_usd_data_feed: Option<Address>,
}

/// A network resolved against the configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NetworkProfile {
    pub name: String,
    pub chain_id: u64,
    pub is_development: bool,
    pub eth_usd_data_feed: Option<Address>,
    pub confirmations: u64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        let mut networks = BTreeMap::new();
        networks.insert(
            "sepolia".to_string(),
            NetworkEntry {
                chain_id: SEPOLIA_CHAIN_ID,
                eth_usd_data_feed: SEPOLIA_ETH_USD_FEED.parse().ok(),
            },
        );
        Self {
            decimals: DECIMALS,
            initial_answer: INITIAL_ANSWER as i64,
            lock_time: 120,
            confirmations: 5,
            development_chains: vec!["hardhat".into(), "local".into()],
            accounts: 10,
            account_balance: Amount::from_ether(10_000),
            networks,
            ledger: LedgerConfig::default(),
        }
    }
}

impl HarnessConfig {
    /// Load and validate a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> DevnetResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> DevnetResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> DevnetResult<String> {
        toml::to_string_pretty(self).map_err(|e| DevnetError::Config(e.to_string()))
    }

    pub fn validate(&self) -> DevnetResult<()> {
        self.ledger
            .validate()
            .map_err(|e| DevnetError::Config(e.to_string()))?;
        if self.initial_answer <= 0 {
            return Err(DevnetError::Config(
                "initial_answer must be positive".into(),
            ));
        }
        if self.decimals > 38 {
            return Err(DevnetError::Config(format!(
                "decimals {} exceeds 38",
                self.decimals
            )));
        }
        if self.accounts < 2 {
            return Err(DevnetError::Config(
                "at least two named accounts are required".into(),
            ));
        }
        for (name, entry) in &self.networks {
            if !self.is_development(name) && entry.eth_usd_data_feed.is_none() {
                return Err(DevnetError::MissingFeed {
                    network: name.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn is_development(&self, network: &str) -> bool {
        self.development_chains.iter().any(|n| n == network)
    }

    /// Resolve a network by name.
    pub fn network(&self, name: &str) -> DevnetResult<NetworkProfile> {
        let is_development = self.is_development(name);
        let entry = self.networks.get(name);
        if entry.is_none() && !is_development {
            return Err(DevnetError::UnknownNetwork(name.to_string()));
        }
        Ok(NetworkProfile {
            name: name.to_string(),
            chain_id: entry.map(|e| e.chain_id).unwrap_or(DEV_CHAIN_ID),
            is_development,
            eth_usd_data_feed: entry.and_then(|e| e.eth_usd_data_feed),
            confirmations: if is_development { 0 } else { self.confirmations },
        })
    }

    /// All known networks, development chains first.
    pub fn network_names(&self) -> Vec<String> {
        let mut names = self.development_chains.clone();
        for name in self.networks.keys() {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        names
    }
}
