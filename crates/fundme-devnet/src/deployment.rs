use std::collections::BTreeMap;

use fundme_types::{Address, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::{DevnetError, DevnetResult};

/// Deployment name of the mock price feed.
pub const MOCK_V3_AGGREGATOR: &str = "MockV3Aggregator";

/// Deployment name of the funding ledger contract.
pub const FUND_ME: &str = "FundMe";

/// A contract deployed on the development chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    pub name: String,
    pub address: Address,
    pub deployer: Address,
    /// Constructor arguments, rendered as strings.
    pub args: Vec<String>,
    pub block: u64,
    pub deployed_at: Timestamp,
}

/// Named deployments; a later deployment under the same name replaces the
/// earlier record.
#[derive(Clone, Debug, Default)]
pub struct DeploymentSet {
    by_name: BTreeMap<String, Deployment>,
}

impl DeploymentSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, deployment: Deployment) {
        self.by_name.insert(deployment.name.clone(), deployment);
    }

    pub fn get(&self, name: &str) -> DevnetResult<&Deployment> {
        self.by_name
            .get(name)
            .ok_or_else(|| DevnetError::DeploymentNotFound(name.to_string()))
    }

    pub fn all(&self) -> impl Iterator<Item = &Deployment> {
        self.by_name.values()
    }
}
