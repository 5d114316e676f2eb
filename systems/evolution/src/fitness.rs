use gem_maze_core::{Fitness, Grid, Route, Waypoints};
use gem_maze_system_search::grid_path;

/// Scores grids by the shortest route through a fixed waypoint sequence.
///
/// A grid's fitness is the sum of node counts of every segment's shortest
/// path. Each segment counts both of its endpoints, so interior waypoints
/// contribute twice. Evaluation stops at the first unreachable segment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FitnessEvaluator {
    waypoints: Waypoints,
}

impl FitnessEvaluator {
    /// Creates an evaluator for the provided waypoints.
    #[must_use]
    pub fn new(waypoints: Waypoints) -> Self {
        Self { waypoints }
    }

    /// Waypoints every route must visit.
    #[must_use]
    pub fn waypoints(&self) -> &Waypoints {
        &self.waypoints
    }

    /// Side length of the grids this evaluator accepts.
    #[must_use]
    pub fn side(&self) -> u32 {
        self.waypoints.side()
    }

    /// Sums the segment lengths of `grid`, or reports it infeasible.
    #[must_use]
    pub fn evaluate(&self, grid: &Grid) -> Fitness {
        let mut total: u32 = 0;
        for (from, to) in self.waypoints.segments() {
            let Some(path) = grid_path(grid, from, to) else {
                return Fitness::Infeasible;
            };
            let length = u32::try_from(path.len()).unwrap_or(u32::MAX);
            total = total.saturating_add(length);
        }
        Fitness::Feasible(total)
    }

    /// Full route through every waypoint, if all segments are reachable.
    #[must_use]
    pub fn route(&self, grid: &Grid) -> Option<Route> {
        self.waypoints
            .segments()
            .map(|(from, to)| grid_path(grid, from, to))
            .collect::<Option<Vec<_>>>()
            .map(Route::from_segments)
    }
}

#[cfg(test)]
mod tests {
    use gem_maze_core::CellCoord;

    use super::*;

    fn corner_evaluator() -> FitnessEvaluator {
        let waypoints = Waypoints::new(5, vec![CellCoord::new(0, 0), CellCoord::new(4, 4)])
            .expect("waypoints");
        FitnessEvaluator::new(waypoints)
    }

    #[test]
    fn open_grid_scores_manhattan_plus_one() {
        let evaluator = corner_evaluator();
        let grid = Grid::new(5).expect("grid");
        assert_eq!(evaluator.evaluate(&grid), Fitness::Feasible(9));
    }

    #[test]
    fn route_length_matches_fitness() {
        let evaluator = corner_evaluator();
        let grid = Grid::from_blocked(5, [CellCoord::new(1, 1), CellCoord::new(2, 2)])
            .expect("grid");

        let route = evaluator.route(&grid).expect("reachable");
        assert_eq!(Fitness::Feasible(route.length()), evaluator.evaluate(&grid));
    }

    #[test]
    fn interior_waypoints_count_twice() {
        let waypoints = Waypoints::new(
            3,
            vec![
                CellCoord::new(0, 0),
                CellCoord::new(2, 0),
                CellCoord::new(2, 2),
            ],
        )
        .expect("waypoints");
        let evaluator = FitnessEvaluator::new(waypoints);
        let grid = Grid::new(3).expect("grid");

        assert_eq!(evaluator.evaluate(&grid), Fitness::Feasible(6));
    }

    #[test]
    fn unreachable_segment_is_infeasible() {
        let evaluator = corner_evaluator();
        let wall = (0..5).map(|column| CellCoord::new(column, 2));
        let grid = Grid::from_blocked(5, wall).expect("grid");

        assert_eq!(evaluator.evaluate(&grid), Fitness::Infeasible);
        assert_eq!(evaluator.route(&grid), None);
    }
}
