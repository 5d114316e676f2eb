//! Elitist generation loop over a fixed-size set of candidate mazes.

use std::sync::Arc;

use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::{EvolutionConfig, EvolutionError, FitnessEvaluator, Individual, RandomizeOptions};

/// Fixed-size collection of valid individuals ranked by fitness.
///
/// After [`Population::initialize`] and after every [`Population::evolve`]
/// the individuals are sorted by fitness, longest route first, and all of
/// them are valid. Per-individual work runs on the rayon pool, each task with
/// its own generator seeded from the population's master generator, so a
/// given seed always reproduces the same run.
#[derive(Debug)]
pub struct Population {
    evaluator: Arc<FitnessEvaluator>,
    config: EvolutionConfig,
    randomize: RandomizeOptions,
    individuals: Vec<Individual>,
    generation: u64,
    rng: ChaCha8Rng,
}

impl Population {
    /// Creates an empty population after validating `config`.
    pub fn new(
        evaluator: Arc<FitnessEvaluator>,
        config: EvolutionConfig,
        seed: u64,
    ) -> Result<Self, EvolutionError> {
        config.validate()?;
        let randomize = config.randomize_options()?;

        Ok(Self {
            evaluator,
            individuals: Vec::with_capacity(config.population_size),
            config,
            randomize,
            generation: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    /// Adds an externally seeded individual, such as a hand-built layout.
    ///
    /// The individual must be valid and scored against the same waypoints.
    pub fn insert(&mut self, individual: Individual) -> Result<(), EvolutionError> {
        if individual.evaluator().waypoints() != self.evaluator.waypoints() {
            return Err(EvolutionError::ProblemMismatch);
        }

        if !individual.is_valid() {
            return Err(EvolutionError::InfeasibleSeed);
        }

        if self.is_full() {
            return Err(EvolutionError::PopulationFull {
                capacity: self.config.population_size,
            });
        }

        self.individuals.push(individual);
        self.sort();
        Ok(())
    }

    /// Fills every empty slot with a randomized individual and ranks them.
    pub fn initialize(&mut self) -> Result<(), EvolutionError> {
        let missing = self
            .config
            .population_size
            .saturating_sub(self.individuals.len());
        let seeds: Vec<u64> = (0..missing).map(|_| self.rng.gen()).collect();
        let evaluator = &self.evaluator;
        let options = &self.randomize;

        info!(
            "initializing {missing} of {} individuals",
            self.config.population_size
        );

        let fresh = seeds
            .into_par_iter()
            .map(|seed| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                let mut individual = Individual::new(Arc::clone(evaluator))?;
                let _ = individual.randomize(&mut rng, options)?;
                Ok::<_, EvolutionError>(individual)
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.individuals.extend(fresh);
        self.sort();
        Ok(())
    }

    /// Advances one generation.
    ///
    /// The elite at rank 0 is never touched directly. Two of its clones are
    /// hill-climbed into the two worst slots and a third clone is mutated
    /// into the third-worst slot. Rank 1 is hill-climbed in place and ranks 2
    /// and 3 are mutated in place. The population is then re-ranked, so the
    /// best fitness never decreases.
    ///
    /// The replacements are installed before ranks 1 to 3 are perturbed, so in
    /// populations smaller than seven some replacements are perturbed twice.
    pub fn evolve(&mut self) -> Result<(), EvolutionError> {
        let capacity = self.config.population_size;
        if self.individuals.len() < capacity {
            return Err(EvolutionError::NotInitialized {
                len: self.individuals.len(),
                capacity,
            });
        }

        let seeds: [u64; 6] = std::array::from_fn(|_| self.rng.gen());
        let gradient_tries = self.config.gradient_tries;
        let mutation_tries = self.config.mutation_tries;

        let elite = &self.individuals[0];
        let mut offspring = vec![elite.clone(), elite.clone(), elite.clone()];
        offspring
            .par_iter_mut()
            .zip(&seeds[..3])
            .enumerate()
            .try_for_each(|(slot, (individual, &seed))| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                let _ = if slot < 2 {
                    individual.gradient_flip(gradient_tries, &mut rng)?
                } else {
                    individual.mutate(mutation_tries, &mut rng)?
                };
                Ok::<_, EvolutionError>(())
            })?;

        for (offset, child) in offspring.into_iter().enumerate() {
            self.individuals[capacity - 1 - offset] = child;
        }

        self.individuals[1..4]
            .par_iter_mut()
            .zip(&seeds[3..])
            .enumerate()
            .try_for_each(|(offset, (individual, &seed))| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                let _ = if offset == 0 {
                    individual.gradient_flip(gradient_tries, &mut rng)?
                } else {
                    individual.mutate(mutation_tries, &mut rng)?
                };
                Ok::<_, EvolutionError>(())
            })?;

        self.sort();
        self.generation += 1;
        debug!(
            "generation {} best fitness {:?}",
            self.generation,
            self.individuals[0].fitness()
        );
        Ok(())
    }

    /// Evolves `generations` times, handing the population to `observer`
    /// after each generation.
    pub fn run<F>(&mut self, generations: u64, mut observer: F) -> Result<(), EvolutionError>
    where
        F: FnMut(&Population),
    {
        for _ in 0..generations {
            self.evolve()?;
            observer(self);
        }
        Ok(())
    }

    /// Individuals ranked by fitness, longest route first.
    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// Highest-ranked individual, if any.
    #[must_use]
    pub fn best(&self) -> Option<&Individual> {
        self.individuals.first()
    }

    /// Number of completed generations.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of individuals currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    /// Reports whether the population holds no individuals.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Reports whether every slot is occupied.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.individuals.len() >= self.config.population_size
    }

    /// Configuration the population was created with.
    #[must_use]
    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    fn sort(&mut self) {
        self.individuals
            .sort_by(|left, right| right.fitness().cmp(&left.fitness()));
    }
}
