use std::{
    collections::VecDeque,
    fmt::Display,
    ops::{Deref, DerefMut},
};

use log::{debug, trace};
use serde::Serialize;

use crate::{
    error::GridError,
    grid::{CellStorage, Grid, Position},
};

#[derive(Clone, Copy, Debug)]
pub struct VisitedItem {
    /// Number of moves from the start
    pub depth: usize,
    pub from: Option<Position>,
}

#[derive(Clone, Copy, Debug)]
pub struct Visited(Option<VisitedItem>);

impl Default for Visited {
    fn default() -> Self {
        Visited(None)
    }
}
impl Deref for Visited {
    type Target = Option<VisitedItem>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl DerefMut for Visited {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
impl Display for Visited {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(item) => write!(f, "{:03} ", item.depth),
            None => write!(f, "{:03} ", ""),
        }
    }
}

/// A shortest route from start to goal, both included. Consecutive cells are 4-adjacent.
#[derive(Debug, PartialEq, Clone, Eq, Serialize)]
pub struct Path {
    cells: Vec<Position>,
}

impl Path {
    pub fn cells(&self) -> &[Position] {
        &self.cells
    }

    /// Number of moves, i.e. one less than the number of cells
    pub fn len(&self) -> usize {
        self.cells.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn start(&self) -> Position {
        self.cells[0]
    }

    pub fn goal(&self) -> Position {
        self.cells[self.cells.len() - 1]
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.cells.contains(&pos)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Position> {
        self.cells.iter()
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Position;
    type IntoIter = std::slice::Iter<'a, Position>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathFinderState {
    Computing,
    NoPathFound,
    PathFound(Path),
}

impl PathFinderState {
    pub fn is_done(&self) -> bool {
        !matches!(self, PathFinderState::Computing)
    }
}

/// Breadth-first search from the grid's start cell to its end cell that can be advanced one
/// cell at a time. All methods must be called with the grid the finder was created from.
#[derive(Debug)]
pub struct PathFinder {
    start: Position,
    goal: Position,
    visited: CellStorage<Visited>,
    frontier: VecDeque<Position>,
    explored: usize,
    state: PathFinderState,
}

impl PathFinder {
    pub fn new(grid: &Grid) -> Result<Self, GridError> {
        let (start, goal) = match (grid.start(), grid.end()) {
            (Some(start), Some(goal)) if start != goal => (start, goal),
            _ => return Err(GridError::MissingEndpoints),
        };

        let mut visited = grid.create_storage::<Visited>();
        *visited.get_mut(start) = Visited(Some(VisitedItem {
            depth: 0,
            from: None,
        }));

        Ok(Self {
            start,
            goal,
            visited,
            frontier: VecDeque::from([start]),
            explored: 0,
            state: PathFinderState::Computing,
        })
    }

    /// Run the search to completion and return the final state and the visited cells
    pub fn finish(mut self, grid: &Grid) -> (PathFinderState, CellStorage<Visited>) {
        loop {
            if self.step(grid).is_done() {
                return (self.state, self.visited);
            }
        }
    }

    /// Advance the search by at most `max_steps` cells. The state is still
    /// [`PathFinderState::Computing`] if the budget ran out first.
    pub fn run(&mut self, grid: &Grid, max_steps: usize) -> &PathFinderState {
        for _ in 0..max_steps {
            if self.step(grid).is_done() {
                break;
            }
        }
        &self.state
    }

    /// Expand the next cell of the frontier
    pub fn step(&mut self, grid: &Grid) -> &PathFinderState {
        if self.state.is_done() {
            return &self.state;
        }

        let Some(current) = self.frontier.pop_front() else {
            debug!(
                "no path from {} to {} after exploring {} cells",
                self.start, self.goal, self.explored
            );
            self.state = PathFinderState::NoPathFound;
            return &self.state;
        };
        self.explored += 1;

        if current == self.goal {
            let path = self.backtrack();
            debug!(
                "found path from {} to {} of length {} after exploring {} cells",
                self.start,
                self.goal,
                path.len(),
                self.explored
            );
            self.state = PathFinderState::PathFound(path);
            return &self.state;
        }

        let depth = self.visited.get(current).map_or(0, |item| item.depth);
        for next in grid.neighbors_of(current) {
            if !grid.cell(next).is_passable() || self.visited.get(next).is_some() {
                continue;
            }
            trace!("discovered {} from {}", next, current);
            *self.visited.get_mut(next) = Visited(Some(VisitedItem {
                depth: depth + 1,
                from: Some(current),
            }));
            self.frontier.push_back(next);
        }

        &self.state
    }

    /// Follow the parent pointers from the goal back to the start
    fn backtrack(&self) -> Path {
        let mut cells = vec![self.goal];
        let mut current = self.goal;

        while let Some(VisitedItem {
            from: Some(from), ..
        }) = *self.visited.get(current)
        {
            cells.push(from);
            current = from;
        }

        cells.reverse();
        Path { cells }
    }

    pub fn state(&self) -> &PathFinderState {
        &self.state
    }

    pub fn get_visited(&self) -> &CellStorage<Visited> {
        &self.visited
    }

    /// Number of cells taken off the frontier so far
    pub fn explored(&self) -> usize {
        self.explored
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn goal(&self) -> Position {
        self.goal
    }
}

/// Flood fill through passable cells. The origin counts as reachable even if it is a barrier.
pub fn reachable_from(grid: &Grid, origin: Position) -> Result<CellStorage<bool>, GridError> {
    grid.get(origin)?;

    let mut reachable = grid.create_storage::<bool>();
    *reachable.get_mut(origin) = true;
    let mut frontier = VecDeque::from([origin]);

    while let Some(current) = frontier.pop_front() {
        for next in grid.neighbors_of(current) {
            if grid.cell(next).is_passable() && !reachable.get(next) {
                *reachable.get_mut(next) = true;
                frontier.push_back(next);
            }
        }
    }

    Ok(reachable)
}
