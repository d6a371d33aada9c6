//! Randomized maze generation by iterative backtracking.
//!
//! Cells with even row and column form a lattice. Carving walks that lattice depth-first in a
//! random order, opening each newly visited lattice cell together with the wall cell between it
//! and the cell it was reached from. The result is a spanning tree over the lattice, so every
//! open cell is connected to the entry.

use std::collections::VecDeque;

use log::debug;
use rand::{seq::SliceRandom, Rng};

use crate::{
    error::GridError,
    find::reachable_from,
    grid::{CellState, Direction, Grid, Position},
};

/// Smallest number of rows or columns a maze can have
pub const MIN_SIZE: usize = 2;

/// Generate a maze with the start in the top left corner and the end in the bottom right
/// corner. The end is always reachable from the start.
pub fn generate<R: Rng + ?Sized>(
    rows: usize,
    columns: usize,
    rng: &mut R,
) -> Result<Grid, GridError> {
    if rows < MIN_SIZE || columns < MIN_SIZE {
        return Err(GridError::InvalidDimensions {
            height: rows,
            width: columns,
        });
    }

    let mut grid = Grid::filled(rows, columns, CellState::Barrier)?;
    let entry = Position::new(0, 0);
    let exit = Position::new(rows as isize - 1, columns as isize - 1);

    let carved = carve(&mut grid, entry, rng)?;
    let opened = connect(&mut grid, entry, exit)?;
    debug!(
        "generated {}x{} maze: carved {} cells, opened {} more to reach the exit",
        rows, columns, carved, opened
    );

    grid.set_cell(entry, CellState::Start)?;
    grid.set_cell(exit, CellState::End)?;

    Ok(grid)
}

/// Depth-first carving with an explicit stack. Returns the number of cells opened.
fn carve<R: Rng + ?Sized>(
    grid: &mut Grid,
    entry: Position,
    rng: &mut R,
) -> Result<usize, GridError> {
    let mut visited = grid.create_storage::<bool>();
    let mut candidates = Vec::with_capacity(Direction::ALL.len());
    let mut stack = vec![entry];

    grid.set_cell(entry, CellState::Empty)?;
    *visited.get_mut(entry) = true;
    let mut carved = 1;

    while let Some(&current) = stack.last() {
        candidates.clear();
        candidates.extend(
            Direction::ALL
                .into_iter()
                .map(|direction| (direction, current.step(direction, 2)))
                .filter(|(_, next)| grid.contains(*next) && !visited.get(*next)),
        );
        candidates.shuffle(rng);

        match candidates.first() {
            Some(&(direction, next)) => {
                grid.set_cell(current.step(direction, 1), CellState::Empty)?;
                grid.set_cell(next, CellState::Empty)?;
                *visited.get_mut(next) = true;
                stack.push(next);
                carved += 2;
            }
            None => {
                stack.pop();
            }
        }
    }

    Ok(carved)
}

/// Make sure `exit` is reachable from `entry` by opening the shortest run of barriers between
/// the exit and the region connected to the entry. Returns the number of cells opened.
///
/// The lattice only reaches the last row or column when that dimension is odd, so for even
/// sizes the exit (and possibly one of its neighbors) is still a wall after carving.
fn connect(grid: &mut Grid, entry: Position, exit: Position) -> Result<usize, GridError> {
    let reachable = reachable_from(grid, entry)?;
    if reachable.get(exit) {
        return Ok(0);
    }

    // search outwards from the exit, through walls, for the nearest connected cell
    let mut seen = grid.create_storage::<bool>();
    let mut parents = grid.create_storage::<Option<Position>>();
    let mut frontier = VecDeque::from([exit]);
    *seen.get_mut(exit) = true;

    let mut joint = None;
    while let Some(current) = frontier.pop_front() {
        if reachable.get(current) {
            joint = Some(current);
            break;
        }
        for next in grid.neighbors_of(current) {
            if !seen.get(next) {
                *seen.get_mut(next) = true;
                *parents.get_mut(next) = Some(current);
                frontier.push_back(next);
            }
        }
    }

    let mut opened = 0;
    let mut cursor = joint.and_then(|joint| parents.get(joint));
    while let Some(cell) = cursor {
        if grid.get(cell)? == CellState::Barrier {
            grid.set_cell(cell, CellState::Empty)?;
            opened += 1;
        }
        cursor = parents.get(cell);
    }

    Ok(opened)
}
