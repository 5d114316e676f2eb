use gem_maze_core::{Cell, Grid, Route};

const OPEN: char = '0';
const BLOCKED: char = '1';
const ROUTE: char = '*';

/// Renders `grid` one row per line, marking cells on `route` with `*`.
///
/// Open cells print as `0` and blocked cells as `1`.
#[must_use]
pub(crate) fn render_grid(grid: &Grid, route: Option<&Route>) -> String {
    let side = usize::try_from(grid.side()).unwrap_or(usize::MAX);
    let mut rendered = String::with_capacity(grid.cell_count() + side);

    for (cell, state) in grid.coords().zip(grid.cells()) {
        let symbol = match state {
            Cell::Blocked => BLOCKED,
            Cell::Open if route.is_some_and(|route| route.contains(cell)) => ROUTE,
            Cell::Open => OPEN,
        };
        rendered.push(symbol);

        if cell.column() + 1 == grid.side() {
            rendered.push('\n');
        }
    }

    rendered
}
