use std::path::Path;

use clap::Parser;
use engine::{Engine, GreedyNetting, GroupSnapshot, InMemoryStore, OptimalNetting};
use serde::Serialize;

use crate::error::Result;
use crate::settings::{Args, Command, Netting, Settings};

mod convert;
mod error;
mod settings;

fn main() -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();
    let settings = settings::load(&args)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "settle={level},engine={level}",
            level = settings.level
        ))
        .with_writer(std::io::stderr)
        .init();

    run(args.command, &settings)?;
    Ok(())
}

fn run(command: Command, settings: &Settings) -> Result<()> {
    match command {
        Command::Settle { snapshot, .. } => {
            let group = read_snapshot(&snapshot)?;
            let group_id = group.id;
            let engine = build_engine(group, settings.netting)?;
            tracing::info!(group = %group_id, policy = %settings.policy, "settling group");

            let result = engine.compute_settlement(group_id, &settings.policy)?;
            print(&convert::settlement_response(&result), settings.pretty)
        }
        Command::Graph { snapshot } => {
            let group = read_snapshot(&snapshot)?;
            let group_id = group.id;
            let engine = build_engine(group, settings.netting)?;
            tracing::info!(group = %group_id, "building settlement graph");

            let result = engine.compute_graph_only(group_id)?;
            print(&convert::graph_response(&result), settings.pretty)
        }
    }
}

fn read_snapshot(path: &Path) -> Result<GroupSnapshot> {
    tracing::debug!("reading snapshot from {}", path.display());
    let raw = std::fs::read_to_string(path)?;
    convert::group_snapshot(serde_json::from_str(&raw)?)
}

fn build_engine(group: GroupSnapshot, netting: Netting) -> Result<Engine> {
    let builder = Engine::builder().store(InMemoryStore::from_iter([group]));
    let engine = match netting {
        Netting::Greedy => builder.netting(GreedyNetting),
        Netting::Optimal => builder.netting(OptimalNetting),
    }
    .build()?;
    Ok(engine)
}

fn print(response: &impl Serialize, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(response)?
    } else {
        serde_json::to_string(response)?
    };
    println!("{json}");
    Ok(())
}
