#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the gem-maze optimizer.
//!
//! This crate defines the vocabulary every other crate speaks: cell
//! coordinates, the tagged [`Cell`] state, the square [`Grid`] that candidate
//! mazes mutate, the validated [`Waypoints`] sequence a route must visit, and
//! the [`Fitness`] and [`Route`] values the evaluator reports back to callers.
//! Systems never share mutable state; they exchange these values by ownership
//! or immutable borrow.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod grid;

pub use grid::Grid;

/// Side length used when callers do not configure the grid explicitly.
pub const DEFAULT_GRID_SIDE: u32 = 40;

/// Waypoints visited by the default maze, expressed as `(column, row)` pairs.
pub const DEFAULT_WAYPOINTS: [(u32, u32); 8] = [
    (0, 5),
    (5, 5),
    (5, 19),
    (33, 19),
    (33, 5),
    (19, 5),
    (19, 33),
    (39, 32),
];

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Coordinates order lexicographically by column and then row. The search
/// uses this order to break ties between equally promising frontier cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }
}

impl From<(u32, u32)> for CellCoord {
    fn from((column, row): (u32, u32)) -> Self {
        Self::new(column, row)
    }
}

/// Traversal state of a single grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Traversable cell that may appear on a route.
    #[default]
    Open,
    /// Untraversable cell that never appears as a search node.
    Blocked,
}

impl Cell {
    /// Returns the opposite traversal state.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Open => Self::Blocked,
            Self::Blocked => Self::Open,
        }
    }

    /// Reports whether the cell can be traversed.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Errors raised when a grid is constructed or addressed incorrectly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// The requested side length was zero.
    #[error("grid side length must be positive")]
    ZeroSide,
    /// A coordinate fell outside the grid.
    #[error("cell ({}, {}) lies outside a grid of side {side}", .cell.column(), .cell.row())]
    OutOfBounds {
        /// Offending coordinate.
        cell: CellCoord,
        /// Side length of the grid that rejected the coordinate.
        side: u32,
    },
}

/// Errors raised when a waypoint sequence fails validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum WaypointError {
    /// Fewer than two waypoints were supplied, so no segment exists.
    #[error("at least two waypoints are required, got {count}")]
    TooFew {
        /// Number of waypoints supplied.
        count: usize,
    },
    /// The grid side was zero or a waypoint lies outside the grid.
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Ordered, validated sequence of cells every route must visit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Waypoints {
    side: u32,
    points: Vec<CellCoord>,
}

impl Waypoints {
    /// Validates the provided points against a grid of the given side.
    pub fn new(side: u32, points: Vec<CellCoord>) -> Result<Self, WaypointError> {
        if side == 0 {
            return Err(GridError::ZeroSide.into());
        }

        if points.len() < 2 {
            return Err(WaypointError::TooFew {
                count: points.len(),
            });
        }

        if let Some(&cell) = points
            .iter()
            .find(|cell| cell.column() >= side || cell.row() >= side)
        {
            return Err(GridError::OutOfBounds { cell, side }.into());
        }

        Ok(Self { side, points })
    }

    /// Side length of the grid the waypoints were validated against.
    #[must_use]
    pub const fn side(&self) -> u32 {
        self.side
    }

    /// Waypoints in visiting order.
    #[must_use]
    pub fn points(&self) -> &[CellCoord] {
        &self.points
    }

    /// Consecutive `(from, to)` pairs that form the route segments.
    pub fn segments(&self) -> impl Iterator<Item = (CellCoord, CellCoord)> + '_ {
        self.points.windows(2).map(|pair| (pair[0], pair[1]))
    }
}

impl Default for Waypoints {
    fn default() -> Self {
        Self {
            side: DEFAULT_GRID_SIDE,
            points: DEFAULT_WAYPOINTS.iter().copied().map(CellCoord::from).collect(),
        }
    }
}

/// Cached quality of a candidate maze.
///
/// Feasible values carry the summed node count of every segment's shortest
/// path. [`Fitness::Infeasible`] orders below every feasible value so sorting
/// descending always ranks valid mazes first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Fitness {
    /// Every segment is reachable; the payload is the total route length.
    Feasible(u32),
    /// At least one segment is unreachable.
    Infeasible,
}

impl Fitness {
    /// Route length when feasible.
    #[must_use]
    pub const fn path_length(self) -> Option<u32> {
        match self {
            Self::Feasible(length) => Some(length),
            Self::Infeasible => None,
        }
    }

    /// Reports whether every segment is reachable.
    #[must_use]
    pub const fn is_feasible(self) -> bool {
        matches!(self, Self::Feasible(_))
    }
}

impl Ord for Fitness {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Feasible(left), Self::Feasible(right)) => left.cmp(right),
            (Self::Feasible(_), Self::Infeasible) => Ordering::Greater,
            (Self::Infeasible, Self::Feasible(_)) => Ordering::Less,
            (Self::Infeasible, Self::Infeasible) => Ordering::Equal,
        }
    }
}

impl PartialOrd for Fitness {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Shortest route through every waypoint, kept per segment.
///
/// Each segment includes both of its endpoints, so an interior waypoint is
/// listed twice when the segments are concatenated. [`Route::length`]
/// therefore matches the feasible [`Fitness`] of the same grid.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    segments: Vec<Vec<CellCoord>>,
}

impl Route {
    /// Creates a route from per-segment node lists.
    #[must_use]
    pub fn from_segments(segments: Vec<Vec<CellCoord>>) -> Self {
        Self { segments }
    }

    /// Node lists for each waypoint segment in visiting order.
    #[must_use]
    pub fn segments(&self) -> &[Vec<CellCoord>] {
        &self.segments
    }

    /// Concatenated cells of every segment in visiting order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.segments.iter().flatten().copied()
    }

    /// Total node count across all segments.
    #[must_use]
    pub fn length(&self) -> u32 {
        let count: usize = self.segments.iter().map(Vec::len).sum();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Reports whether the route visits the provided cell.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.segments.iter().any(|segment| segment.contains(&cell))
    }
}
