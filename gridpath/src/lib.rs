//! Grid puzzles: a cell grid, a randomized maze generator and a breadth-first shortest path
//! solver. All state lives in the [`Grid`] passed to each call.

pub mod error;
pub mod find;
pub mod grid;
pub mod maze;
pub mod util;

use rand::Rng;

pub use error::GridError;
pub use find::{Path, PathFinder, PathFinderState};
pub use grid::{CellState, Direction, Grid, Position, Toggle};

/// Generate a maze with the start at `(0, 0)` and the end at `(rows - 1, columns - 1)`.
/// Both dimensions must be at least 2.
pub fn generate_maze<R: Rng + ?Sized>(
    rows: usize,
    columns: usize,
    rng: &mut R,
) -> Result<Grid, GridError> {
    maze::generate(rows, columns, rng)
}

/// A grid without barriers for drawing by hand
pub fn create_empty_grid(rows: usize, columns: usize) -> Result<Grid, GridError> {
    Grid::new(rows, columns)
}

/// Find a shortest path between the grid's start and end cells. `Ok(None)` means the end cannot
/// be reached from the start.
pub fn find_path(grid: &Grid) -> Result<Option<Path>, GridError> {
    let (state, _) = PathFinder::new(grid)?.finish(grid);

    Ok(match state {
        PathFinderState::PathFound(path) => Some(path),
        _ => None,
    })
}

/// Like [`find_path`], but also replaces any old path markers on the grid with the new path
pub fn solve(grid: &mut Grid) -> Result<Option<Path>, GridError> {
    grid.clear_path();

    let path = find_path(grid)?;
    if let Some(path) = &path {
        grid.mark_path(path);
    }

    Ok(path)
}
