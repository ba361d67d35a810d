use std::collections::HashMap;
use std::sync::Arc;

use fundme_ledger::{
    ConservationAuditor, EventRecord, FundingLedger, FundingReader, FundingWriter, LedgerEvent,
    SharedLedger, Transition, ValidationReport,
};
use fundme_oracle::{MockV3Aggregator, PriceFeed};
use fundme_types::{Address, Amount, Timestamp};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::config::{HarnessConfig, NetworkProfile};
use crate::deployment::{Deployment, DeploymentSet, FUND_ME, MOCK_V3_AGGREGATOR};
use crate::error::{DevnetError, DevnetResult};

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// An event emitted by a contract on the chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChainEvent {
    pub contract: Address,
    pub block: u64,
    pub record: EventRecord,
}

/// Receipt of a committed contract call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CallReceipt {
    pub block: u64,
    pub timestamp: Timestamp,
    pub from: Address,
    pub contract: Address,
    pub value: Amount,
    pub events: Vec<EventRecord>,
}

impl CallReceipt {
    /// The first event emitted by the call.
    pub fn event(&self) -> Option<&LedgerEvent> {
        self.events.first().map(|record| &record.event)
    }

    pub fn emitted(&self, name: &str) -> bool {
        self.events.iter().any(|record| record.event.name() == name)
    }
}

/// In-process development chain.
///
/// Every committed call mines one block one second after the previous
/// block. Rejected calls mine nothing and move no funds: the caller's
/// balance, and the payout recipient's headroom, are checked before the
/// contract runs, and balances are only debited or credited once the
/// contract has committed. Every commit is followed by a conservation audit
/// of the ledger.
pub struct DevChain {
    config: HarnessConfig,
    network: NetworkProfile,
    now: Timestamp,
    block: u64,
    accounts: Vec<Address>,
    balances: HashMap<Address, Amount>,
    nonces: HashMap<Address, u64>,
    deployments: DeploymentSet,
    feeds: HashMap<Address, Arc<MockV3Aggregator>>,
    ledgers: HashMap<Address, Arc<SharedLedger>>,
    events: broadcast::Sender<ChainEvent>,
}

impl DevChain {
    /// Start a chain for `network` with the genesis block at wall-clock now.
    pub fn new(config: HarnessConfig, network: &str) -> DevnetResult<Self> {
        Self::with_genesis(config, network, Timestamp::now())
    }

    pub fn with_genesis(
        config: HarnessConfig,
        network: &str,
        genesis: Timestamp,
    ) -> DevnetResult<Self> {
        config.validate()?;
        let network = config.network(network)?;
        let accounts: Vec<Address> = (0..config.accounts).map(named_account).collect();
        let balances = accounts
            .iter()
            .map(|addr| (*addr, config.account_balance))
            .collect();
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        info!(
            network = %network.name,
            chain_id = network.chain_id,
            development = network.is_development,
            %genesis,
            "development chain started"
        );

        Ok(Self {
            config,
            network,
            now: genesis,
            block: 0,
            accounts,
            balances,
            nonces: HashMap::new(),
            deployments: DeploymentSet::new(),
            feeds: HashMap::new(),
            ledgers: HashMap::new(),
            events,
        })
    }

    // ---- Accounts and clock ----

    pub fn first_account(&self) -> Address {
        self.accounts[0]
    }

    pub fn second_account(&self) -> Address {
        self.accounts[1]
    }

    pub fn account(&self, index: usize) -> Option<Address> {
        self.accounts.get(index).copied()
    }

    pub fn accounts(&self) -> &[Address] {
        &self.accounts
    }

    /// Native balance of an account or contract.
    pub fn balance_of(&self, address: &Address) -> DevnetResult<Amount> {
        if let Some(ledger) = self.ledgers.get(address) {
            return Ok(ledger.held()?);
        }
        Ok(self.account_balance(address))
    }

    pub fn set_balance(&mut self, address: Address, amount: Amount) {
        self.balances.insert(address, amount);
    }

    /// Timestamp of the latest block.
    pub fn now(&self) -> Timestamp {
        self.now
    }

    pub fn block_number(&self) -> u64 {
        self.block
    }

    /// Move the clock forward and mine a block at the new time.
    pub fn increase_time(&mut self, secs: u64) {
        let at = self.now.plus(secs);
        debug!(secs, %at, "time increased");
        self.mine_at(at);
    }

    /// Mine an empty block one second after the latest.
    pub fn mine(&mut self) {
        let at = self.next_block_time();
        self.mine_at(at);
    }

    pub fn network(&self) -> &NetworkProfile {
        &self.network
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    // ---- Deployment ----

    /// Deploy the mock feed and FundMe with the configured lock time.
    ///
    /// Live networks resolve their configured feed and then fail, since this
    /// chain has no transport to reach them.
    pub fn deploy_all(&mut self) -> DevnetResult<Address> {
        let deployer = self.first_account();
        if !self.network.is_development {
            let feed = self
                .network
                .eth_usd_data_feed
                .ok_or_else(|| DevnetError::MissingFeed {
                    network: self.network.name.clone(),
                })?;
            warn!(network = %self.network.name, %feed, "live network deployment requested");
            return Err(DevnetError::LiveNetworkUnsupported {
                network: self.network.name.clone(),
                feed,
            });
        }

        let feed = self.deploy_mock(deployer)?;
        let fund_me = self.deploy_fund_me(deployer, self.config.lock_time, feed)?;
        info!(network = %self.network.name, "local network verification skipped");
        Ok(fund_me)
    }

    /// Deploy a mock ETH/USD feed. Development networks only.
    pub fn deploy_mock(&mut self, deployer: Address) -> DevnetResult<Address> {
        if !self.network.is_development {
            info!(network = %self.network.name, "environment is not local, mock deployment skipped");
            return Err(DevnetError::MockOnLiveNetwork(self.network.name.clone()));
        }
        let address = self.next_contract_address(&deployer);
        let at = self.next_block_time();
        let answer = i128::from(self.config.initial_answer);
        let feed = Arc::new(MockV3Aggregator::new(
            address,
            self.config.decimals,
            answer,
            at,
        ));
        self.feeds.insert(address, feed);
        self.mine_at(at);
        self.record_deployment(
            MOCK_V3_AGGREGATOR,
            address,
            deployer,
            vec![self.config.decimals.to_string(), answer.to_string()],
        );
        Ok(address)
    }

    /// Deploy a FundMe ledger that reads prices from `feed`.
    pub fn deploy_fund_me(
        &mut self,
        deployer: Address,
        lock_time: u64,
        feed: Address,
    ) -> DevnetResult<Address> {
        let price_feed: Arc<dyn PriceFeed> = self
            .feeds
            .get(&feed)
            .map(|mock| Arc::clone(mock) as Arc<dyn PriceFeed>)
            .ok_or(DevnetError::UnknownFeed(feed))?;
        let address = self.next_contract_address(&deployer);
        let at = self.next_block_time();
        let ledger = FundingLedger::new(
            deployer,
            lock_time,
            price_feed,
            self.config.ledger.clone(),
            at,
        )?;
        self.ledgers.insert(address, Arc::new(SharedLedger::new(ledger)));
        self.mine_at(at);
        self.record_deployment(
            FUND_ME,
            address,
            deployer,
            vec![lock_time.to_string(), feed.to_hex()],
        );
        Ok(address)
    }

    pub fn deployment(&self, name: &str) -> DevnetResult<&Deployment> {
        self.deployments.get(name)
    }

    pub fn deployments(&self) -> &DeploymentSet {
        &self.deployments
    }

    /// Handle to a deployed ledger for read access.
    pub fn ledger(&self, contract: &Address) -> DevnetResult<Arc<SharedLedger>> {
        self.ledgers
            .get(contract)
            .cloned()
            .ok_or(DevnetError::UnknownContract(*contract))
    }

    /// Handle to a deployed mock feed, e.g. to publish a new answer.
    pub fn feed(&self, address: &Address) -> DevnetResult<Arc<MockV3Aggregator>> {
        self.feeds
            .get(address)
            .cloned()
            .ok_or(DevnetError::UnknownFeed(*address))
    }

    /// Subscribe to events emitted by committed calls from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<ChainEvent> {
        self.events.subscribe()
    }

    // ---- Contract calls ----

    /// `fund` with `value` attached, sent from `from`.
    pub fn fund(
        &mut self,
        contract: Address,
        from: Address,
        value: Amount,
    ) -> DevnetResult<CallReceipt> {
        let ledger = self.ledger(&contract)?;
        let available = self.account_balance(&from);
        if available < value {
            return Err(DevnetError::InsufficientBalance {
                account: from,
                needed: value,
                available,
            });
        }
        let at = self.next_block_time();
        let transition = ledger.fund(from, value, at)?;
        self.balances.insert(from, available.saturating_sub(value));
        self.commit(contract, from, value, at, transition)
    }

    /// Owner withdrawal, sent from `from`.
    pub fn get_fund(&mut self, contract: Address, from: Address) -> DevnetResult<CallReceipt> {
        let ledger = self.ledger(&contract)?;
        if ledger.owner()? == from {
            self.ensure_can_receive(from, ledger.held()?)?;
        }
        let at = self.next_block_time();
        let transition = ledger.get_fund(from, at)?;
        self.commit(contract, from, Amount::ZERO, at, transition)
    }

    /// Refund of the sender's contribution.
    pub fn refund(&mut self, contract: Address, from: Address) -> DevnetResult<CallReceipt> {
        let ledger = self.ledger(&contract)?;
        self.ensure_can_receive(from, ledger.funder_to_amount(&from)?)?;
        let at = self.next_block_time();
        let transition = ledger.refund(from, at)?;
        self.commit(contract, from, Amount::ZERO, at, transition)
    }

    /// Recorded contribution of `funder` in `contract`.
    pub fn funder_to_amount(&self, contract: &Address, funder: &Address) -> DevnetResult<Amount> {
        Ok(self.ledger(contract)?.funder_to_amount(funder)?)
    }

    /// Audit a deployed ledger's balance invariants.
    pub fn audit(&self, contract: &Address) -> DevnetResult<ValidationReport> {
        Ok(self.ledger(contract)?.with_ledger(ConservationAuditor::audit)?)
    }

    // ---- Internals ----

    fn ensure_can_receive(&self, account: Address, amount: Amount) -> DevnetResult<()> {
        match self.account_balance(&account).checked_add(amount) {
            Some(_) => Ok(()),
            None => Err(DevnetError::BalanceOverflow { account, amount }),
        }
    }

    fn commit(
        &mut self,
        contract: Address,
        from: Address,
        value: Amount,
        at: Timestamp,
        transition: Transition,
    ) -> DevnetResult<CallReceipt> {
        if let Some(payout) = transition.payout {
            let credited = self
                .account_balance(&payout.to)
                .checked_add(payout.amount)
                .ok_or(DevnetError::BalanceOverflow {
                    account: payout.to,
                    amount: payout.amount,
                })?;
            self.balances.insert(payout.to, credited);
            debug!(to = %payout.to, amount = %payout.amount, "payout credited");
        }
        self.mine_at(at);

        let report = self.audit(&contract)?;
        for violation in &report.violations {
            warn!(
                contract = %contract,
                kind = ?violation.kind,
                description = %violation.description,
                "ledger invariant violated"
            );
        }

        let event = ChainEvent {
            contract,
            block: self.block,
            record: transition.record.clone(),
        };
        // No subscribers is fine.
        let _ = self.events.send(event);

        Ok(CallReceipt {
            block: self.block,
            timestamp: at,
            from,
            contract,
            value,
            events: vec![transition.record],
        })
    }

    fn account_balance(&self, address: &Address) -> Amount {
        self.balances.get(address).copied().unwrap_or(Amount::ZERO)
    }

    fn next_block_time(&self) -> Timestamp {
        self.now.plus(1)
    }

    fn mine_at(&mut self, at: Timestamp) {
        if at > self.now {
            self.now = at;
        }
        self.block += 1;
    }

    fn next_contract_address(&mut self, deployer: &Address) -> Address {
        let nonce = self.nonces.entry(*deployer).or_insert(0);
        let address = Address::contract(deployer, *nonce);
        *nonce += 1;
        address
    }

    fn record_deployment(
        &mut self,
        name: &str,
        address: Address,
        deployer: Address,
        args: Vec<String>,
    ) {
        info!(
            deployment = name,
            %address,
            %deployer,
            block = self.block,
            "contract deployed"
        );
        self.deployments.record(Deployment {
            name: name.to_string(),
            address,
            deployer,
            args,
            block: self.block,
            deployed_at: self.now,
        });
    }
}

/// Deterministic address of the `index`-th named account.
fn named_account(index: usize) -> Address {
    match index {
        0 => Address::derive("firstAccount"),
        1 => Address::derive("secondAccount"),
        n => Address::derive(&format!("account{n}")),
    }
}
