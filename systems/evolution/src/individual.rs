//! Candidate mazes and their mutation operators.

use std::sync::Arc;

use gem_maze_core::{Cell, CellCoord, Fitness, Grid, Route};
use log::{debug, warn};
use rand::{distributions::Distribution, Rng};

use crate::{EvolutionError, FitnessEvaluator, RandomizeOptions};

/// Result of a single [`Individual::flip`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlipOutcome {
    /// The cell changed state and every segment stayed reachable.
    Applied,
    /// The change cut off a segment and was undone.
    Reverted,
}

/// One candidate maze: a grid plus its cached fitness.
///
/// The cached fitness always describes the current grid. Every operator that
/// touches the grid re-evaluates it before returning, and operators that can
/// break reachability roll back instead of leaving the individual invalid.
/// Clones copy the grid; only the read-only evaluator is shared.
#[derive(Clone, Debug)]
pub struct Individual {
    evaluator: Arc<FitnessEvaluator>,
    grid: Grid,
    fitness: Fitness,
}

impl Individual {
    /// Creates an individual over an all-open grid.
    pub fn new(evaluator: Arc<FitnessEvaluator>) -> Result<Self, EvolutionError> {
        let grid = Grid::new(evaluator.side())?;
        Ok(Self::evaluated(evaluator, grid))
    }

    /// Wraps an externally supplied grid, such as a layout built by a player.
    ///
    /// The grid is evaluated as-is and may be invalid.
    pub fn with_grid(evaluator: Arc<FitnessEvaluator>, grid: Grid) -> Result<Self, EvolutionError> {
        if grid.side() != evaluator.side() {
            return Err(EvolutionError::DimensionMismatch {
                expected: evaluator.side(),
                found: grid.side(),
            });
        }
        Ok(Self::evaluated(evaluator, grid))
    }

    fn evaluated(evaluator: Arc<FitnessEvaluator>, grid: Grid) -> Self {
        let fitness = evaluator.evaluate(&grid);
        Self {
            evaluator,
            grid,
            fitness,
        }
    }

    /// Current grid.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Consumes the individual, yielding its grid.
    #[must_use]
    pub fn into_grid(self) -> Grid {
        self.grid
    }

    /// Cached fitness of the current grid.
    #[must_use]
    pub fn fitness(&self) -> Fitness {
        self.fitness
    }

    /// Reports whether every waypoint segment is reachable.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.fitness.is_feasible()
    }

    /// Evaluator that scores this individual.
    #[must_use]
    pub fn evaluator(&self) -> &Arc<FitnessEvaluator> {
        &self.evaluator
    }

    /// Full route through every waypoint on the current grid.
    #[must_use]
    pub fn route(&self) -> Option<Route> {
        self.evaluator.route(&self.grid)
    }

    /// Refills the grid at random until every segment is reachable.
    ///
    /// Each attempt blocks every cell independently according to `options`.
    /// Returns the number of attempts used. When the attempt budget runs out,
    /// the previous grid and fitness are restored and
    /// [`EvolutionError::RandomizationExhausted`] is returned.
    pub fn randomize<R: Rng>(
        &mut self,
        rng: &mut R,
        options: &RandomizeOptions,
    ) -> Result<u32, EvolutionError> {
        let previous_grid = self.grid.clone();
        let previous_fitness = self.fitness;
        let mut attempts: u32 = 0;

        loop {
            if let Some(limit) = options.max_attempts() {
                if attempts >= limit.get() {
                    self.grid = previous_grid;
                    self.fitness = previous_fitness;
                    warn!("randomization gave up after {attempts} attempts");
                    return Err(EvolutionError::RandomizationExhausted { attempts });
                }
            }

            attempts = attempts.saturating_add(1);
            let distribution = options.distribution();
            self.grid.fill_with(|_| {
                if distribution.sample(&mut *rng) {
                    Cell::Blocked
                } else {
                    Cell::Open
                }
            });
            self.fitness = self.evaluator.evaluate(&self.grid);

            if self.is_valid() {
                debug!(
                    "randomized maze after {attempts} attempts, fitness {:?}",
                    self.fitness
                );
                return Ok(attempts);
            }
        }
    }

    /// Toggles `cell`, keeping the change only if every segment stays reachable.
    ///
    /// A rejected toggle restores both the cell and the previous fitness, so
    /// flipping the same cell twice always returns to the starting state.
    pub fn flip(&mut self, cell: CellCoord) -> Result<FlipOutcome, EvolutionError> {
        let previous = self.fitness;
        let _ = self.grid.toggle(cell)?;
        let fitness = self.evaluator.evaluate(&self.grid);

        if fitness.is_feasible() {
            self.fitness = fitness;
            return Ok(FlipOutcome::Applied);
        }

        let _ = self.grid.toggle(cell)?;
        self.fitness = previous;
        Ok(FlipOutcome::Reverted)
    }

    /// Hill-climbs by probing `tries` random cells.
    ///
    /// A probe is kept only when it strictly lengthens the route; otherwise it
    /// is undone. Returns the number of probes kept.
    pub fn gradient_flip<R: Rng>(
        &mut self,
        tries: u32,
        rng: &mut R,
    ) -> Result<u32, EvolutionError> {
        let mut improvements = 0;

        for _ in 0..tries {
            let cell = self.random_cell(rng);
            let before = self.fitness;

            if self.flip(cell)? == FlipOutcome::Reverted {
                continue;
            }

            if self.fitness > before {
                improvements += 1;
            } else {
                // the previous grid is restored exactly, so is its fitness
                let _ = self.grid.toggle(cell)?;
                self.fitness = before;
            }
        }

        Ok(improvements)
    }

    /// Random walk over valid mazes: flips `tries` random cells regardless of
    /// fitness. Returns the number of flips that were applied.
    pub fn mutate<R: Rng>(&mut self, tries: u32, rng: &mut R) -> Result<u32, EvolutionError> {
        let mut applied = 0;

        for _ in 0..tries {
            let cell = self.random_cell(rng);
            if self.flip(cell)? == FlipOutcome::Applied {
                applied += 1;
            }
        }

        Ok(applied)
    }

    /// Greedy union of two parents.
    ///
    /// Starting from an open grid, cells are visited in row-major order and
    /// blocked whenever either parent blocks them, unless doing so would cut
    /// off a segment. The result depends on that visiting order and is always
    /// valid.
    pub fn crossover(&self, other: &Individual) -> Result<Individual, EvolutionError> {
        if !Arc::ptr_eq(&self.evaluator, &other.evaluator) && self.evaluator != other.evaluator {
            return Err(EvolutionError::ProblemMismatch);
        }

        if self.grid.side() != other.grid.side() {
            return Err(EvolutionError::DimensionMismatch {
                expected: self.grid.side(),
                found: other.grid.side(),
            });
        }

        let mut child = Individual::new(Arc::clone(&self.evaluator))?;
        for cell in self.grid.coords() {
            let blocked_by_either = self.grid.cell(cell) == Some(Cell::Blocked)
                || other.grid.cell(cell) == Some(Cell::Blocked);

            if blocked_by_either {
                let _ = child.flip(cell)?;
            }
        }

        child.fitness = child.evaluator.evaluate(&child.grid);
        Ok(child)
    }

    fn random_cell<R: Rng>(&self, rng: &mut R) -> CellCoord {
        let side = self.grid.side();
        CellCoord::new(rng.gen_range(0..side), rng.gen_range(0..side))
    }
}

#[cfg(test)]
mod tests {
    use gem_maze_core::Waypoints;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn corner_evaluator() -> Arc<FitnessEvaluator> {
        let waypoints = Waypoints::new(5, vec![CellCoord::new(0, 0), CellCoord::new(4, 4)])
            .expect("waypoints");
        Arc::new(FitnessEvaluator::new(waypoints))
    }

    #[test]
    fn new_individual_is_open_and_valid() {
        let individual = Individual::new(corner_evaluator()).expect("individual");
        assert_eq!(individual.grid().blocked_count(), 0);
        assert_eq!(individual.fitness(), Fitness::Feasible(9));
        assert!(individual.is_valid());
    }

    #[test]
    fn with_grid_rejects_mismatched_side() {
        let grid = Grid::new(6).expect("grid");
        let result = Individual::with_grid(corner_evaluator(), grid);
        assert_eq!(
            result.err(),
            Some(EvolutionError::DimensionMismatch {
                expected: 5,
                found: 6,
            })
        );
    }

    #[test]
    fn flip_rejects_cells_outside_the_grid() {
        let mut individual = Individual::new(corner_evaluator()).expect("individual");
        assert!(matches!(
            individual.flip(CellCoord::new(5, 0)),
            Err(EvolutionError::Grid(_))
        ));
    }

    #[test]
    fn flip_reverts_when_waypoint_is_blocked() {
        let mut individual = Individual::new(corner_evaluator()).expect("individual");
        let outcome = individual.flip(CellCoord::new(0, 0)).expect("in bounds");

        assert_eq!(outcome, FlipOutcome::Reverted);
        assert_eq!(individual.grid().blocked_count(), 0);
        assert_eq!(individual.fitness(), Fitness::Feasible(9));
    }

    #[test]
    fn exhausted_randomization_restores_previous_state() {
        let mut individual = Individual::new(corner_evaluator()).expect("individual");
        let options = RandomizeOptions::new(0.999, std::num::NonZeroU32::new(3))
            .expect("options");
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let result = individual.randomize(&mut rng, &options);

        assert_eq!(
            result,
            Err(EvolutionError::RandomizationExhausted { attempts: 3 })
        );
        assert_eq!(individual.grid().blocked_count(), 0);
        assert_eq!(individual.fitness(), Fitness::Feasible(9));
    }

    #[test]
    fn zero_probability_randomizes_on_first_attempt() {
        let mut individual = Individual::new(corner_evaluator()).expect("individual");
        let options = RandomizeOptions::new(0.0, None).expect("options");
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        assert_eq!(individual.randomize(&mut rng, &options), Ok(1));
        assert_eq!(individual.grid().blocked_count(), 0);
    }
}
