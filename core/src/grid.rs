//! Dense square grid of traversal states.

use crate::{Cell, CellCoord, GridError};

/// Square matrix of [`Cell`] values stored in row-major order.
///
/// The side length is fixed at construction. Every accessor bounds-checks its
/// coordinate, so out-of-range cells are reported rather than wrapped.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    side: u32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates an all-open grid with the provided side length.
    pub fn new(side: u32) -> Result<Self, GridError> {
        let side_usize = usize::try_from(side).map_err(|_| GridError::ZeroSide)?;
        let cell_count = side_usize
            .checked_mul(side_usize)
            .filter(|&count| count > 0)
            .ok_or(GridError::ZeroSide)?;

        Ok(Self {
            side,
            cells: vec![Cell::Open; cell_count],
        })
    }

    /// Creates a grid whose listed cells are blocked and all others open.
    pub fn from_blocked<I>(side: u32, blocked: I) -> Result<Self, GridError>
    where
        I: IntoIterator<Item = CellCoord>,
    {
        let mut grid = Self::new(side)?;
        for cell in blocked {
            let _ = grid.set(cell, Cell::Blocked)?;
        }
        Ok(grid)
    }

    /// Side length of the grid in cells.
    #[must_use]
    pub const fn side(&self) -> u32 {
        self.side
    }

    /// Total number of cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Dense cell states in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.side && cell.row() < self.side
    }

    /// State of the provided cell, if it lies within the grid.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> Option<Cell> {
        self.index(cell).and_then(|index| self.cells.get(index).copied())
    }

    /// Reports whether the cell lies inside the grid and is open.
    #[must_use]
    pub fn is_open(&self, cell: CellCoord) -> bool {
        self.cell(cell).is_some_and(Cell::is_open)
    }

    /// Overwrites a cell, returning its previous state.
    pub fn set(&mut self, cell: CellCoord, state: Cell) -> Result<Cell, GridError> {
        let slot = self.slot_mut(cell)?;
        Ok(std::mem::replace(slot, state))
    }

    /// Flips a cell between open and blocked, returning its new state.
    pub fn toggle(&mut self, cell: CellCoord) -> Result<Cell, GridError> {
        let slot = self.slot_mut(cell)?;
        *slot = slot.toggled();
        Ok(*slot)
    }

    /// Reassigns every cell from the provided closure, visiting in row-major order.
    pub fn fill_with<F>(&mut self, mut state_for: F)
    where
        F: FnMut(CellCoord) -> Cell,
    {
        let side = self.side;
        for (index, slot) in self.cells.iter_mut().enumerate() {
            *slot = state_for(coord_at(side, index));
        }
    }

    /// Every coordinate of the grid in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = CellCoord> {
        let side = self.side;
        (0..self.cells.len()).map(move |index| coord_at(side, index))
    }

    /// Coordinates of every blocked cell in row-major order.
    pub fn blocked_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        let side = self.side;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| !cell.is_open())
            .map(move |(index, _)| coord_at(side, index))
    }

    /// Number of blocked cells.
    #[must_use]
    pub fn blocked_count(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_open()).count()
    }

    /// Open cells adjacent to `cell` along the four cardinal directions.
    ///
    /// Diagonal cells are never neighbours.
    pub fn open_neighbors(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
        neighbors(cell, self.side).filter(move |neighbor| self.is_open(*neighbor))
    }

    fn slot_mut(&mut self, cell: CellCoord) -> Result<&mut Cell, GridError> {
        let side = self.side;
        self.index(cell)
            .and_then(|index| self.cells.get_mut(index))
            .ok_or(GridError::OutOfBounds { cell, side })
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }

        let width = usize::try_from(self.side).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

fn coord_at(side: u32, index: usize) -> CellCoord {
    let width = side as usize;
    CellCoord::new((index % width) as u32, (index / width) as u32)
}

fn neighbors(cell: CellCoord, side: u32) -> impl Iterator<Item = CellCoord> {
    let mut candidates = [None; 4];
    let mut count = 0;

    if let Some(row) = cell.row().checked_sub(1) {
        candidates[count] = Some(CellCoord::new(cell.column(), row));
        count += 1;
    }

    if let Some(column) = cell.column().checked_add(1) {
        if column < side {
            candidates[count] = Some(CellCoord::new(column, cell.row()));
            count += 1;
        }
    }

    if let Some(row) = cell.row().checked_add(1) {
        if row < side {
            candidates[count] = Some(CellCoord::new(cell.column(), row));
            count += 1;
        }
    }

    if let Some(column) = cell.column().checked_sub(1) {
        candidates[count] = Some(CellCoord::new(column, cell.row()));
        count += 1;
    }

    candidates.into_iter().take(count).flatten()
}
