//! Handles settings for the application. Configuration is read from
//! `config/settle.toml` (or `--config`), then from `SETTLE_*` environment
//! variables, then from command line flags.
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/settle.toml";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Netting {
    #[default]
    Greedy,
    Optimal,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub level: String,
    /// Policy used by `settle` when `--policy` is not given.
    pub policy: String,
    pub netting: Netting,
    pub pretty: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            policy: "equal_split".to_string(),
            netting: Netting::default(),
            pretty: true,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "settle", version, about = "Settle shared group expenses")]
pub struct Args {
    /// Optional config file path (TOML).
    #[arg(long, global = true)]
    pub config: Option<String>,
    /// Override log level (e.g. debug).
    #[arg(long, global = true)]
    pub level: Option<String>,
    /// Override the netting strategy.
    #[arg(long, global = true, value_enum)]
    pub netting: Option<Netting>,
    /// Print single-line JSON.
    #[arg(long, global = true)]
    pub compact: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute the payments that settle a group under a policy.
    Settle {
        /// Group snapshot document (JSON).
        #[arg(long)]
        snapshot: PathBuf,
        /// One of equal_split, income_based, custom_share, proportional.
        #[arg(long)]
        policy: Option<String>,
    },
    /// Print raw balances and the settlement graph of a group.
    Graph {
        #[arg(long)]
        snapshot: PathBuf,
    },
}

pub fn load(args: &Args) -> Result<Settings> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("SETTLE"));
    let mut settings: Settings = builder.build()?.try_deserialize()?;

    if let Some(level) = &args.level {
        settings.level = level.clone();
    }
    if let Some(netting) = args.netting {
        settings.netting = netting;
    }
    if args.compact {
        settings.pretty = false;
    }
    if let Command::Settle {
        policy: Some(policy),
        ..
    } = &args.command
    {
        settings.policy = policy.clone();
    }

    Ok(settings)
}
