#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Evolutionary optimizer that searches for hard-to-traverse mazes.
//!
//! A [`FitnessEvaluator`] measures a grid by summing the shortest path of
//! every waypoint segment. [`Individual`] pairs one grid with its cached
//! fitness and exposes validity-preserving mutation operators, while
//! [`Population`] runs the elitist generation loop on top of them.
//!
//! Randomness is always injected by the caller or derived from a seed, so two
//! populations created with the same seed evolve identically even though
//! independent individuals are processed on the rayon thread pool.

mod config;
mod error;
mod fitness;
mod individual;
mod population;

pub use config::{ConfigError, EvolutionConfig, RandomizeOptions, MIN_POPULATION_SIZE};
pub use error::EvolutionError;
pub use fitness::FitnessEvaluator;
pub use individual::{FlipOutcome, Individual};
pub use population::Population;
