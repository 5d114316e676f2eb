use gem_maze_core::GridError;
use thiserror::Error;

use crate::ConfigError;

/// Failures reported by individuals and populations.
///
/// Unreachable segments are not errors; they surface as
/// [`gem_maze_core::Fitness::Infeasible`]. These variants cover malformed
/// inputs and exhausted retry budgets.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum EvolutionError {
    /// The evolution configuration is out of range.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A cell coordinate fell outside the grid.
    #[error(transparent)]
    Grid(#[from] GridError),
    /// A grid does not match the side the waypoints were validated against.
    #[error("grid side {found} does not match the waypoint grid side {expected}")]
    DimensionMismatch {
        /// Side required by the waypoints.
        expected: u32,
        /// Side of the offending grid.
        found: u32,
    },
    /// Two individuals were evaluated against different waypoint sequences.
    #[error("individuals are evaluated against different waypoints")]
    ProblemMismatch,
    /// Randomization never produced a reachable route within its budget.
    #[error("no valid maze found after {attempts} randomization attempts")]
    RandomizationExhausted {
        /// Attempts made before giving up.
        attempts: u32,
    },
    /// An externally supplied maze leaves a segment unreachable.
    #[error("seeded maze leaves at least one waypoint segment unreachable")]
    InfeasibleSeed,
    /// The population already holds its configured number of individuals.
    #[error("population is already full with {capacity} individuals")]
    PopulationFull {
        /// Configured population size.
        capacity: usize,
    },
    /// The population must be filled before it can evolve.
    #[error("population holds {len} of {capacity} individuals; initialize it first")]
    NotInitialized {
        /// Individuals currently held.
        len: usize,
        /// Configured population size.
        capacity: usize,
    },
}
