#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter for the game-state engine.

mod inspect;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use sc2_state_registry::IdRegistry;

/// Inspect game payloads and publish the id registry.
#[derive(Debug, Parser)]
#[command(name = "sc2-state", version)]
struct Cli {
    /// Log analysis details at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render the registry artifact from a `stableid.json` table.
    Registry {
        /// Raw stable id table.
        #[arg(long)]
        table: PathBuf,
        /// Destination file; standard output when omitted.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Build the static map and decode one observation, then print a summary.
    Inspect {
        /// Raw stable id table.
        #[arg(long)]
        table: PathBuf,
        /// Unit type data as JSON.
        #[arg(long)]
        game_data: PathBuf,
        /// Static map description as JSON.
        #[arg(long)]
        map: PathBuf,
        /// Observation of one step as JSON.
        #[arg(long)]
        observation: PathBuf,
        /// Map analysis thresholds as TOML.
        #[arg(long)]
        tuning: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if verbose {
        let _builder = builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Registry { table, out } => {
            let registry = inspect::load_registry(&table)?;
            publish(&registry, out)
        }
        Command::Inspect {
            table,
            game_data,
            map,
            observation,
            tuning,
        } => {
            let inputs = inspect::Inputs {
                table,
                game_data,
                map,
                observation,
                tuning,
            };
            print!("{}", inspect::run(&inputs)?);
            Ok(())
        }
    }
}

fn publish(registry: &IdRegistry, out: Option<PathBuf>) -> Result<()> {
    let artifact = registry.render();
    match out {
        Some(path) => fs::write(&path, artifact)
            .with_context(|| format!("failed to write registry artifact to {}", path.display())),
        None => {
            print!("{artifact}");
            Ok(())
        }
    }
}
