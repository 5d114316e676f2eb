//! Tuning knobs for the evolution loop.

use std::num::NonZeroU32;

use rand::distributions::Bernoulli;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest population holding the elite plus the three ranks perturbed in
/// place. Below seven the elite-derived replacements land on ranks 1 to 3 and
/// are perturbed again in the same generation.
pub const MIN_POPULATION_SIZE: usize = 4;

/// Aggregated parameters controlling how a population is seeded and evolved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvolutionConfig {
    /// Number of individuals kept alive in every generation.
    pub population_size: usize,
    /// Probability that randomization blocks any given cell.
    pub block_probability: f64,
    /// Random cells probed by each hill-climbing step.
    pub gradient_tries: u32,
    /// Random cells flipped by each undirected mutation step.
    pub mutation_tries: u32,
    /// Upper bound on randomization attempts per individual; `None` retries forever.
    pub max_randomize_attempts: Option<NonZeroU32>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 10,
            block_probability: 0.3,
            gradient_tries: 20,
            mutation_tries: 5,
            max_randomize_attempts: NonZeroU32::new(10_000),
        }
    }
}

impl EvolutionConfig {
    /// Checks every knob, reporting the first one that is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size < MIN_POPULATION_SIZE {
            return Err(ConfigError::PopulationTooSmall {
                size: self.population_size,
            });
        }

        if self.gradient_tries == 0 {
            return Err(ConfigError::ZeroTries {
                operator: "gradient flip",
            });
        }

        if self.mutation_tries == 0 {
            return Err(ConfigError::ZeroTries {
                operator: "mutation",
            });
        }

        let _ = self.randomize_options()?;
        Ok(())
    }

    /// Randomization parameters derived from this configuration.
    pub fn randomize_options(&self) -> Result<RandomizeOptions, ConfigError> {
        RandomizeOptions::new(self.block_probability, self.max_randomize_attempts)
    }
}

/// Validated parameters for [`crate::Individual::randomize`].
#[derive(Clone, Copy, Debug)]
pub struct RandomizeOptions {
    distribution: Bernoulli,
    max_attempts: Option<NonZeroU32>,
}

impl RandomizeOptions {
    /// Creates options that block cells with probability `block_probability`.
    ///
    /// The probability must lie in `[0, 1)`; a certain block would never
    /// leave a reachable route.
    pub fn new(
        block_probability: f64,
        max_attempts: Option<NonZeroU32>,
    ) -> Result<Self, ConfigError> {
        if !(0.0..1.0).contains(&block_probability) {
            return Err(ConfigError::InvalidBlockProbability {
                probability: block_probability,
            });
        }

        let distribution = Bernoulli::new(block_probability).map_err(|_| {
            ConfigError::InvalidBlockProbability {
                probability: block_probability,
            }
        })?;

        Ok(Self {
            distribution,
            max_attempts,
        })
    }

    /// Per-cell blocking distribution.
    #[must_use]
    pub fn distribution(&self) -> &Bernoulli {
        &self.distribution
    }

    /// Maximum number of attempts, if bounded.
    #[must_use]
    pub fn max_attempts(&self) -> Option<NonZeroU32> {
        self.max_attempts
    }
}

/// Reasons an [`EvolutionConfig`] or [`RandomizeOptions`] is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The population cannot hold the elite plus every perturbed slot.
    #[error("population size {size} is below the minimum of {}", MIN_POPULATION_SIZE)]
    PopulationTooSmall {
        /// Requested population size.
        size: usize,
    },
    /// The blocking probability is outside `[0, 1)`.
    #[error("block probability {probability} must lie in [0, 1)")]
    InvalidBlockProbability {
        /// Requested probability.
        probability: f64,
    },
    /// A mutation operator was configured to do nothing.
    #[error("{operator} tries must be positive")]
    ZeroTries {
        /// Operator whose try count was zero.
        operator: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration_is_valid() {
        assert_eq!(EvolutionConfig::default().validate(), Ok(()));
    }

    #[test]
    fn small_populations_are_rejected() {
        let config = EvolutionConfig {
            population_size: 3,
            ..EvolutionConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::PopulationTooSmall { size: 3 })
        );
    }

    #[test]
    fn smallest_population_is_accepted() {
        let config = EvolutionConfig {
            population_size: MIN_POPULATION_SIZE,
            ..EvolutionConfig::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn certain_blocking_is_rejected() {
        for probability in [1.0, -0.1, f64::NAN] {
            assert!(RandomizeOptions::new(probability, None).is_err());
        }
        assert!(RandomizeOptions::new(0.0, None).is_ok());
    }

    #[test]
    fn zero_tries_are_rejected() {
        let config = EvolutionConfig {
            mutation_tries: 0,
            ..EvolutionConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroTries {
                operator: "mutation"
            })
        );
    }
}
