use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "fundme",
    about = "FundMe: time-boxed crowdfunding ledger on a development chain",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML harness configuration; built-in defaults when omitted
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, default_value = "hardhat")]
    pub network: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Deploy the mock feed and FundMe
    Deploy,
    /// Fund from the first and second accounts and show balances
    Interact(InteractArgs),
    /// Run a full funding lifecycle past the deadline
    Scenario(ScenarioArgs),
    /// List configured networks
    Networks,
}

#[derive(Args)]
pub struct InteractArgs {
    /// Contribution from the first account, in ETH
    #[arg(long, default_value = "0.05")]
    pub amount: String,
    /// Contribution from the second account, in ETH
    #[arg(long, default_value = "0.04")]
    pub second_amount: String,
}

#[derive(Args)]
pub struct ScenarioArgs {
    pub outcome: Outcome,
    /// Contribution from the first account, in ETH; defaults to an amount
    /// that leads to the chosen outcome
    #[arg(long)]
    pub amount: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Outcome {
    /// Target reached, owner withdraws
    Withdraw,
    /// Target missed, funder takes a refund
    Refund,
}

impl Outcome {
    pub fn default_amount(self) -> &'static str {
        match self {
            Self::Withdraw => "1",
            Self::Refund => "0.05",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Withdraw => "Owner withdrawal",
            Self::Refund => "Refund",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_deploy() {
        let cli = Cli::try_parse_from(["fundme", "deploy"]).unwrap();
        assert!(matches!(cli.command, Command::Deploy));
        assert_eq!(cli.network, "hardhat");
        assert!(cli.config.is_none());
    }

    #[test]
    fn parse_interact_defaults() {
        let cli = Cli::try_parse_from(["fundme", "interact"]).unwrap();
        if let Command::Interact(args) = cli.command {
            assert_eq!(args.amount, "0.05");
            assert_eq!(args.second_amount, "0.04");
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_interact_amounts() {
        let cli = Cli::try_parse_from([
            "fundme",
            "interact",
            "--amount",
            "0.1",
            "--second-amount",
            "0.2",
        ])
        .unwrap();
        if let Command::Interact(args) = cli.command {
            assert_eq!(args.amount, "0.1");
            assert_eq!(args.second_amount, "0.2");
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_scenario() {
        let cli = Cli::try_parse_from(["fundme", "scenario", "refund", "--amount", "0.04"]).unwrap();
        if let Command::Scenario(args) = cli.command {
            assert_eq!(args.outcome, Outcome::Refund);
            assert_eq!(args.amount.as_deref(), Some("0.04"));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn scenario_requires_outcome() {
        assert!(Cli::try_parse_from(["fundme", "scenario"]).is_err());
        assert!(Cli::try_parse_from(["fundme", "scenario", "drain"]).is_err());
    }

    #[test]
    fn parse_globals_after_subcommand() {
        let cli = Cli::try_parse_from([
            "fundme",
            "networks",
            "--network",
            "sepolia",
            "--config",
            "fundme.toml",
            "--format",
            "json",
            "-v",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Networks));
        assert_eq!(cli.network, "sepolia");
        assert_eq!(cli.config, Some(PathBuf::from("fundme.toml")));
        assert!(matches!(cli.format, OutputFormat::Json));
        assert!(cli.verbose);
    }

    #[test]
    fn default_amounts_match_outcomes() {
        assert_eq!(Outcome::Withdraw.default_amount(), "1");
        assert_eq!(Outcome::Refund.default_amount(), "0.05");
    }
}
