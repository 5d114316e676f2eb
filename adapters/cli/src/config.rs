use std::{fs, path::Path};

use anyhow::{Context, Result};
use gem_maze_core::{CellCoord, WaypointError, Waypoints, DEFAULT_GRID_SIDE, DEFAULT_WAYPOINTS};
use gem_maze_system_evolution::EvolutionConfig;
use serde::Deserialize;

/// Problem definition and evolution parameters read from a TOML file.
///
/// Every key is optional; missing keys fall back to the built-in 40x40 maze.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct MazeConfig {
    /// Side length of the square grid.
    pub(crate) side: u32,
    /// Waypoints as `[column, row]` pairs, in visiting order.
    pub(crate) waypoints: Vec<(u32, u32)>,
    /// Parameters handed to the population.
    pub(crate) evolution: EvolutionConfig,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            side: DEFAULT_GRID_SIDE,
            waypoints: DEFAULT_WAYPOINTS.to_vec(),
            evolution: EvolutionConfig::default(),
        }
    }
}

impl MazeConfig {
    /// Reads and parses the configuration stored at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("could not read config file '{}'", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("could not parse config file '{}'", path.display()))
    }

    /// Validated waypoints for the configured grid.
    pub(crate) fn waypoints(&self) -> Result<Waypoints, WaypointError> {
        let points = self.waypoints.iter().copied().map(CellCoord::from).collect();
        Waypoints::new(self.side, points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_default_maze() {
        let config: MazeConfig = toml::from_str("").expect("parses");

        assert_eq!(config, MazeConfig::default());
        assert_eq!(config.waypoints().expect("valid"), Waypoints::default());
    }

    #[test]
    fn partial_evolution_table_keeps_other_defaults() {
        let config: MazeConfig = toml::from_str(
            r#"
                side = 10
                waypoints = [[0, 1], [9, 1], [9, 8]]

                [evolution]
                population_size = 7
                block_probability = 0.2
            "#,
        )
        .expect("parses");

        assert_eq!(config.side, 10);
        assert_eq!(config.evolution.population_size, 7);
        assert_eq!(config.evolution.block_probability, 0.2);
        assert_eq!(
            config.evolution.gradient_tries,
            EvolutionConfig::default().gradient_tries
        );

        let waypoints = config.waypoints().expect("valid");
        assert_eq!(waypoints.points().len(), 3);
        assert_eq!(waypoints.points()[2], CellCoord::new(9, 8));
    }

    #[test]
    fn waypoints_outside_the_grid_are_rejected() {
        let config: MazeConfig =
            toml::from_str("side = 5\nwaypoints = [[0, 0], [5, 5]]").expect("parses");

        assert!(matches!(config.waypoints(), Err(WaypointError::Grid(_))));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<MazeConfig>("sides = 12").is_err());
    }
}
