use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use fundme_devnet::{CallReceipt, DevChain, HarnessConfig, LedgerEvent};
use fundme_ledger::FundingReader;
use fundme_types::{Address, Amount};
use serde_json::json;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let Cli {
        command,
        format,
        config,
        network,
        ..
    } = cli;
    let config = load_config(config.as_deref())?;
    match command {
        Command::Deploy => cmd_deploy(config, &network, format),
        Command::Interact(args) => cmd_interact(config, &network, format, args),
        Command::Scenario(args) => cmd_scenario(config, &network, format, args),
        Command::Networks => cmd_networks(&config, format),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<HarnessConfig> {
    match path {
        Some(path) => HarnessConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display())),
        None => Ok(HarnessConfig::default()),
    }
}

fn parse_eth(input: &str) -> anyhow::Result<Amount> {
    Amount::parse_ether(input).with_context(|| format!("invalid ETH amount {input:?}"))
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn deploy(config: HarnessConfig, network: &str) -> anyhow::Result<(DevChain, Address)> {
    let mut chain = DevChain::new(config, network)?;
    let fund_me = chain.deploy_all()?;
    Ok((chain, fund_me))
}

fn cmd_deploy(config: HarnessConfig, network: &str, format: OutputFormat) -> anyhow::Result<()> {
    let (chain, fund_me) = deploy(config, network)?;
    let ledger = chain.ledger(&fund_me)?;
    let owner = ledger.owner()?;
    let data_feed = ledger.data_feed()?;
    let deadline = ledger.deadline()?;
    let window_secs = deadline.seconds_since(&chain.now());

    match format {
        OutputFormat::Json => print_json(&json!({
            "network": network,
            "fund_me": fund_me,
            "owner": owner,
            "data_feed": data_feed,
            "deadline": deadline,
            "window_secs": window_secs,
            "deployments": chain.deployments().all().collect::<Vec<_>>(),
        })),
        OutputFormat::Text => {
            println!(
                "{} FundMe deployed on {}",
                "✓".green().bold(),
                network.bold()
            );
            println!("  Contract:  {}", fund_me.to_hex().cyan());
            println!("  Owner:     {}", owner.to_hex().cyan());
            println!("  Data feed: {}", data_feed.to_hex().cyan());
            println!(
                "  Deadline:  {} ({}s from now)",
                deadline.to_string().yellow(),
                window_secs
            );
            Ok(())
        }
    }
}

fn cmd_interact(
    config: HarnessConfig,
    network: &str,
    format: OutputFormat,
    args: InteractArgs,
) -> anyhow::Result<()> {
    let first_amount = parse_eth(&args.amount)?;
    let second_amount = parse_eth(&args.second_amount)?;
    let (mut chain, fund_me) = deploy(config, network)?;
    let first = chain.first_account();
    let second = chain.second_account();

    chain.fund(fund_me, first, first_amount)?;
    let after_first = chain.balance_of(&fund_me)?;
    chain.fund(fund_me, second, second_amount)?;
    let after_second = chain.balance_of(&fund_me)?;

    let first_recorded = chain.funder_to_amount(&fund_me, &first)?;
    let second_recorded = chain.funder_to_amount(&fund_me, &second)?;

    match format {
        OutputFormat::Json => print_json(&json!({
            "fund_me": fund_me,
            "balance_after_first_fund": after_first,
            "balance_after_second_fund": after_second,
            "funder_to_amount": {
                (first.to_hex()): first_recorded,
                (second.to_hex()): second_recorded,
            },
        })),
        OutputFormat::Text => {
            println!("FundMe at {}", fund_me.to_hex().cyan());
            println!(
                "  {} funded {}; contract balance {}",
                first.short_id(),
                first_amount,
                after_first.to_string().bold()
            );
            println!(
                "  {} funded {}; contract balance {}",
                second.short_id(),
                second_amount,
                after_second.to_string().bold()
            );
            println!("Balance of firstAccount {}", first_recorded.to_string().green());
            println!("Balance of secondAccount {}", second_recorded.to_string().green());
            Ok(())
        }
    }
}

fn cmd_scenario(
    config: HarnessConfig,
    network: &str,
    format: OutputFormat,
    args: ScenarioArgs,
) -> anyhow::Result<()> {
    let amount = parse_eth(args.amount.as_deref().unwrap_or(args.outcome.default_amount()))?;
    let (mut chain, fund_me) = deploy(config, network)?;
    let mut events = chain.subscribe();
    let first = chain.first_account();

    chain.fund(fund_me, first, amount)?;
    let lock_time = chain.config().lock_time;
    chain.increase_time(lock_time + 1);
    chain.mine();
    let phase = chain.ledger(&fund_me)?.phase(chain.now())?;

    let receipt: CallReceipt = match args.outcome {
        Outcome::Withdraw => chain.get_fund(fund_me, first)?,
        Outcome::Refund => chain.refund(fund_me, first)?,
    };

    let mut emitted = Vec::new();
    while let Ok(event) = events.try_recv() {
        emitted.push(event);
    }
    let log = chain.ledger(&fund_me)?.events_since(0)?;
    let audit = chain.audit(&fund_me)?;

    match format {
        OutputFormat::Json => print_json(&json!({
            "fund_me": fund_me,
            "phase": phase.to_string(),
            "receipt": receipt,
            "events": emitted,
            "log": log,
            "audit": audit,
        })),
        OutputFormat::Text => {
            println!("FundMe at {}", fund_me.to_hex().cyan());
            println!("  Phase after deadline: {}", phase.to_string().yellow());
            for event in &emitted {
                println!(
                    "  {} {}",
                    format!("#{}", event.block).dimmed(),
                    describe(&event.record.event)
                );
            }
            println!(
                "{} {} committed in block {}",
                "✓".green().bold(),
                args.outcome.label(),
                receipt.block
            );
            println!("  Ledger log: {} events", log.len());
            if audit.is_valid() {
                println!("  Audit: {}", "balances conserved".green());
            } else {
                for violation in &audit.violations {
                    println!("  Audit: {}", violation.description.red());
                }
            }
            Ok(())
        }
    }
}

fn describe(event: &LedgerEvent) -> String {
    match event {
        LedgerEvent::Funded { funder, amount } => {
            format!("{} {} by {}", "Funded".green(), amount, funder.short_id())
        }
        LedgerEvent::FundWithdrawByOwner { amount } => {
            format!("{} {}", "FundWithdrawByOwner".yellow(), amount)
        }
        LedgerEvent::RefundByFunder { funder, amount } => {
            format!(
                "{} {} to {}",
                "RefundByFunder".yellow(),
                amount,
                funder.short_id()
            )
        }
    }
}

fn cmd_networks(config: &HarnessConfig, format: OutputFormat) -> anyhow::Result<()> {
    let profiles = config
        .network_names()
        .iter()
        .map(|name| config.network(name))
        .collect::<Result<Vec<_>, _>>()?;

    match format {
        OutputFormat::Json => print_json(&serde_json::to_value(&profiles)?),
        OutputFormat::Text => {
            for profile in &profiles {
                let kind = if profile.is_development {
                    "development".green()
                } else {
                    "live".yellow()
                };
                let feed = profile
                    .eth_usd_data_feed
                    .map(|feed| feed.to_hex())
                    .unwrap_or_else(|| "mock".into());
                println!(
                    "{:<10} chain {:<9} {:<12} feed {}",
                    profile.name.bold(),
                    profile.chain_id,
                    kind,
                    feed.cyan()
                );
            }
            Ok(())
        }
    }
}
