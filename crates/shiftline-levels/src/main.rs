mod dedupe;
mod pipeline;
mod store;

use anyhow::Result;
use clap::{Parser, Subcommand};
use shiftline_core::{Analyzer, EngineConfig};
use std::path::PathBuf;

/// Default RNG seed for reproducible level sets.
const DEFAULT_SEED: u64 = 240125;

#[derive(Parser)]
#[command(name = "shiftline-levels", about = "Build and maintain Shiftline level sets")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rebuild the full 200-level set from scratch.
    Generate {
        /// Output directory for level_NNN.json files.
        #[arg(long, default_value = "levels")]
        dir: PathBuf,
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
    },
    /// Replace symmetry duplicates in an existing level set.
    Dedupe {
        #[arg(long, default_value = "levels")]
        dir: PathBuf,
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
    },
    /// Re-analyze one level file and print its verdict.
    Rate {
        file: PathBuf,
        /// Visited-state cap for the solver.
        #[arg(long)]
        state_cap: Option<usize>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Command::Generate { dir, seed } => pipeline::run(&dir, seed),
        Command::Dedupe { dir, seed } => dedupe::run(&dir, seed),
        Command::Rate { file, state_cap } => rate(&file, state_cap),
    }
}

fn rate(file: &std::path::Path, state_cap: Option<usize>) -> Result<()> {
    let level_file = store::load(file)?;
    let config = match state_cap {
        Some(cap) => EngineConfig::with_state_cap(cap),
        None => EngineConfig::default(),
    };
    match Analyzer::with_config(config).try_analyze(&level_file.setup()) {
        Ok(level) => {
            println!(
                "{}: {} (par {}, {:.2} per block, ordering {}, multi-swipe {})",
                file.display(),
                level.label(),
                level.par_moves(),
                level.par_per_block(),
                level.ordering(),
                level.multi_swipe(),
            );
            if level.label() != level_file.label() {
                log::warn!(
                    "stored label {} disagrees with analysis {}",
                    level_file.label(),
                    level.label()
                );
            }
            Ok(())
        }
        Err(rejection) => {
            anyhow::bail!("{}: rejected: {}", file.display(), rejection)
        }
    }
}
