#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Best-first shortest-path search used to measure maze routes.
//!
//! [`search`] is a generic A* over any node type, parameterised by heuristic,
//! edge-cost and neighbour closures. [`grid_path`] binds it to a [`Grid`]
//! with four-way movement and straight-line distances.

use std::{
    cmp::{Ordering, Reverse},
    collections::{BinaryHeap, HashMap},
    hash::Hash,
};

use gem_maze_core::{CellCoord, Grid};

/// Finds a cheapest path from `start` to `goal` using A*.
///
/// The frontier always expands the node with the lowest estimated total cost
/// `g + heuristic`. Equal estimates are resolved by expanding the smallest node
/// according to `N`'s [`Ord`] implementation, so repeated searches over the
/// same inputs always return the same path. A node whose best-known cost
/// improves after expansion is admitted to the frontier again.
///
/// The returned path includes both `start` and `goal`. `None` signals that the
/// frontier emptied without reaching `goal`.
pub fn search<N, H, D, E, I>(
    start: N,
    goal: N,
    mut heuristic: H,
    mut edge_cost: D,
    mut neighbors: E,
) -> Option<Vec<N>>
where
    N: Copy + Eq + Hash + Ord,
    H: FnMut(N) -> f64,
    D: FnMut(N, N) -> f64,
    E: FnMut(N) -> I,
    I: IntoIterator<Item = N>,
{
    let mut frontier = BinaryHeap::new();
    let mut best_cost: HashMap<N, f64> = HashMap::new();
    let mut came_from: HashMap<N, N> = HashMap::new();

    let _ = best_cost.insert(start, 0.0);
    frontier.push(Reverse(FrontierEntry {
        estimate: heuristic(start),
        cost: 0.0,
        node: start,
    }));

    while let Some(Reverse(entry)) = frontier.pop() {
        let current = entry.node;

        // superseded by a cheaper admission
        if best_cost
            .get(&current)
            .is_some_and(|&known| entry.cost > known)
        {
            continue;
        }

        if current == goal {
            return Some(reconstruct_path(&came_from, current));
        }

        for neighbor in neighbors(current) {
            let tentative = entry.cost + edge_cost(current, neighbor);
            let improves = best_cost
                .get(&neighbor)
                .map_or(true, |&known| tentative < known);

            if !improves {
                continue;
            }

            let _ = came_from.insert(neighbor, current);
            let _ = best_cost.insert(neighbor, tentative);
            frontier.push(Reverse(FrontierEntry {
                estimate: tentative + heuristic(neighbor),
                cost: tentative,
                node: neighbor,
            }));
        }
    }

    None
}

/// Shortest four-way path between two cells of `grid`.
///
/// Uses the straight-line distance to `goal` as heuristic and the
/// straight-line distance between adjacent cells as edge cost. Blocked or
/// out-of-bounds endpoints never become search nodes, so they yield `None`.
#[must_use]
pub fn grid_path(grid: &Grid, start: CellCoord, goal: CellCoord) -> Option<Vec<CellCoord>> {
    if !grid.is_open(start) || !grid.is_open(goal) {
        return None;
    }

    search(
        start,
        goal,
        |cell| cartesian_distance(cell, goal),
        cartesian_distance,
        |cell| grid.open_neighbors(cell),
    )
}

/// Straight-line distance between the centres of two cells.
#[must_use]
pub fn cartesian_distance(from: CellCoord, to: CellCoord) -> f64 {
    let dx = f64::from(from.column()) - f64::from(to.column());
    let dy = f64::from(from.row()) - f64::from(to.row());
    dx.hypot(dy)
}

fn reconstruct_path<N>(came_from: &HashMap<N, N>, goal: N) -> Vec<N>
where
    N: Copy + Eq + Hash,
{
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(&previous) = came_from.get(&current) {
        path.push(previous);
        current = previous;
    }
    path.reverse();
    path
}

#[derive(Clone, Copy, Debug)]
struct FrontierEntry<N> {
    estimate: f64,
    cost: f64,
    node: N,
}

impl<N: Ord> Ord for FrontierEntry<N> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.estimate
            .total_cmp(&other.estimate)
            .then_with(|| self.node.cmp(&other.node))
    }
}

impl<N: Ord> PartialOrd for FrontierEntry<N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<N: Ord> PartialEq for FrontierEntry<N> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<N: Ord> Eq for FrontierEntry<N> {}
