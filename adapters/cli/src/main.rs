#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that evolves a hard maze and reports the winner.

mod config;
mod layout_transfer;
mod report;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use gem_maze_system_evolution::{FitnessEvaluator, Individual, Population};
use log::info;

use crate::{config::MazeConfig, layout_transfer::LayoutSnapshot, report::render_grid};

const DEFAULT_SEED: u64 = 0x6d61_7a65;

/// Evolves maze layouts whose shortest waypoint route is as long as possible.
#[derive(Debug, Parser)]
#[command(name = "gem-maze", version)]
struct CliArgs {
    /// TOML file with `side`, `waypoints` and an `[evolution]` table.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of generations to evolve.
    #[arg(long, default_value_t = 100)]
    generations: u64,

    /// Seed for the population's random generator.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Layout transfer string used to seed the population.
    #[arg(long, value_name = "STRING")]
    layout: Option<String>,

    /// Print the winning layout as a transfer string.
    #[arg(long)]
    export: bool,

    /// Print the winning grid with its route marked.
    #[arg(long)]
    print_grid: bool,
}

/// Entry point for the gem-maze command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let args = CliArgs::parse();

    let config = match &args.config {
        Some(path) => MazeConfig::load(path)?,
        None => MazeConfig::default(),
    };
    let waypoints = config.waypoints().context("invalid waypoints")?;
    let evaluator = Arc::new(FitnessEvaluator::new(waypoints));
    let mut population = Population::new(Arc::clone(&evaluator), config.evolution, args.seed)
        .context("invalid evolution settings")?;

    if let Some(layout) = &args.layout {
        let grid = LayoutSnapshot::decode(layout)
            .and_then(LayoutSnapshot::into_grid)
            .context("could not read --layout")?;
        let seeded = Individual::with_grid(Arc::clone(&evaluator), grid)
            .context("--layout does not match the configured grid")?;
        population
            .insert(seeded)
            .context("--layout cannot seed the population")?;
        info!("seeded population with supplied layout");
    }

    population.initialize()?;
    info!(
        "initial best fitness {:?}",
        population.best().map(Individual::fitness)
    );

    let report_every = (args.generations / 10).max(1);
    population.run(args.generations, |population| {
        if population.generation() % report_every == 0 {
            info!(
                "generation {} best fitness {:?}",
                population.generation(),
                population.best().map(Individual::fitness)
            );
        }
    })?;

    let best = population.best().context("population is empty")?;
    let length = best
        .fitness()
        .path_length()
        .context("best individual is infeasible")?;
    println!(
        "generation {}: best route length {length}",
        population.generation()
    );

    if args.print_grid {
        print!("{}", render_grid(best.grid(), best.route().as_ref()));
    }

    if args.export {
        println!("{}", LayoutSnapshot::capture(best.grid()).encode()?);
    }

    Ok(())
}
