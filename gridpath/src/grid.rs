use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::GridError;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Empty,
    Barrier,
    Start,
    End,
    /// Marker stamped by the solver on the cells of a found path
    Path,
}

impl CellState {
    pub fn is_passable(self) -> bool {
        self != CellState::Barrier
    }
}

impl Display for CellState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                CellState::Empty => " ",
                CellState::Barrier => "X",
                CellState::Start => "S",
                CellState::End => "E",
                CellState::Path => ".",
            }
        )
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// The order in which neighbors are visited. Breadth-first search breaks ties using this
    /// order, so changing it changes which of several shortest paths is returned.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// A cell coordinate. Signed so that callers can express positions just outside the grid, which
/// are then rejected with [`GridError::OutOfBounds`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: isize,
    pub col: isize,
}

impl Position {
    pub const fn new(row: isize, col: isize) -> Self {
        Self { row, col }
    }

    /// The position `distance` cells away in the given direction (may be out of bounds)
    pub fn step(self, direction: Direction, distance: isize) -> Self {
        let (dr, dc) = direction.delta();
        Self {
            row: self.row + dr * distance,
            col: self.col + dc * distance,
        }
    }

    pub fn manhattan_distance(self, other: Position) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    pub fn is_adjacent(self, other: Position) -> bool {
        self.manhattan_distance(other) == 1
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl FromStr for Position {
    type Err = anyhow::Error;

    /// Parses `row,col`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (row, col) = s
            .split_once(',')
            .ok_or_else(|| anyhow::anyhow!("Invalid position, expected row,col: {}", s))?;
        Ok(Position {
            row: row.trim().parse()?,
            col: col.trim().parse()?,
        })
    }
}

/// Result of [`Grid::toggle_barrier`]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Toggle {
    /// The cell became a barrier
    Placed,
    /// The barrier was removed
    Removed,
    /// Start and end cells are never turned into barriers
    Unchanged,
}

/// A rectangular grid of cells that also tracks which cells hold the start and end tags
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GridData", into = "GridData")]
pub struct Grid {
    rows: usize,
    columns: usize,
    cells: Vec<CellState>,
    start: Option<Position>,
    end: Option<Position>,
}

impl Grid {
    /// Create a grid where every cell is [`CellState::Empty`]
    pub fn new(rows: usize, columns: usize) -> Result<Self, GridError> {
        Self::filled(rows, columns, CellState::Empty)
    }

    /// Create a grid where every cell holds `state`. Only `Empty` and `Barrier` make sense here,
    /// start and end are single-holder tags and must be placed with [`Grid::set_cell`].
    pub(crate) fn filled(
        rows: usize,
        columns: usize,
        state: CellState,
    ) -> Result<Self, GridError> {
        debug_assert!(matches!(state, CellState::Empty | CellState::Barrier));

        // positions are signed, so every row and column index must fit in an isize
        let size = rows
            .checked_mul(columns)
            .filter(|&size| {
                size > 0 && rows <= isize::MAX as usize && columns <= isize::MAX as usize
            })
            .ok_or(GridError::InvalidDimensions {
                height: rows,
                width: columns,
            })?;

        Ok(Self {
            rows,
            columns,
            cells: vec![state; size],
            start: None,
            end: None,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn start(&self) -> Option<Position> {
        self.start
    }

    pub fn end(&self) -> Option<Position> {
        self.end
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row >= 0
            && pos.col >= 0
            && (pos.row as usize) < self.rows
            && (pos.col as usize) < self.columns
    }

    fn index(&self, pos: Position) -> Result<usize, GridError> {
        if self.contains(pos) {
            Ok(pos.row as usize * self.columns + pos.col as usize)
        } else {
            Err(GridError::OutOfBounds {
                position: pos,
                height: self.rows,
                width: self.columns,
            })
        }
    }

    fn position_of(&self, index: usize) -> Position {
        Position::new(
            (index / self.columns) as isize,
            (index % self.columns) as isize,
        )
    }

    pub fn get(&self, pos: Position) -> Result<CellState, GridError> {
        Ok(self.cells[self.index(pos)?])
    }

    /// Lookup for positions that are already known to be inside the grid
    pub(crate) fn cell(&self, pos: Position) -> CellState {
        self.cells[pos.row as usize * self.columns + pos.col as usize]
    }

    /// Set the state of a cell. Placing a start or end tag demotes the previous holder of that
    /// tag to empty, and overwriting the current holder clears the tag.
    pub fn set_cell(&mut self, pos: Position, state: CellState) -> Result<(), GridError> {
        let index = self.index(pos)?;

        match self.cells[index] {
            CellState::Start if state != CellState::Start => self.start = None,
            CellState::End if state != CellState::End => self.end = None,
            _ => {}
        }

        let previous = match state {
            CellState::Start => self.start.replace(pos),
            CellState::End => self.end.replace(pos),
            _ => None,
        };
        if let Some(previous) = previous.filter(|&p| p != pos) {
            let previous = self.index(previous)?;
            self.cells[previous] = CellState::Empty;
        }

        self.cells[index] = state;
        Ok(())
    }

    /// Flip a cell between empty and barrier. A path marker counts as empty.
    pub fn toggle_barrier(&mut self, pos: Position) -> Result<Toggle, GridError> {
        let index = self.index(pos)?;

        let (state, toggle) = match self.cells[index] {
            CellState::Start | CellState::End => return Ok(Toggle::Unchanged),
            CellState::Barrier => (CellState::Empty, Toggle::Removed),
            CellState::Empty | CellState::Path => (CellState::Barrier, Toggle::Placed),
        };
        self.cells[index] = state;

        Ok(toggle)
    }

    /// The in-bounds neighbors of `pos` in the order up, down, left, right
    pub fn neighbors(
        &self,
        pos: Position,
    ) -> Result<impl Iterator<Item = Position> + '_, GridError> {
        self.index(pos)?;
        Ok(self.neighbors_of(pos))
    }

    pub(crate) fn neighbors_of(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        Direction::ALL
            .into_iter()
            .map(move |direction| pos.step(direction, 1))
            .filter(|p| self.contains(*p))
    }

    /// Iterate over all cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (Position, CellState)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, cell)| (self.position_of(i), *cell))
    }

    /// Stamp path markers on the empty cells of `path`. Start, end and barrier cells are left
    /// untouched, as are positions outside the grid.
    pub fn mark_path<'a>(&mut self, path: impl IntoIterator<Item = &'a Position>) {
        for pos in path {
            if let Ok(index) = self.index(*pos) {
                if self.cells[index] == CellState::Empty {
                    self.cells[index] = CellState::Path;
                }
            }
        }
    }

    /// Remove all path markers left by a previous solve
    pub fn clear_path(&mut self) {
        self.replace_all(CellState::Path, CellState::Empty);
    }

    /// Remove all barriers (and path markers), keeping start and end in place
    pub fn clear_barriers(&mut self) {
        self.replace_all(CellState::Barrier, CellState::Empty);
        self.clear_path();
    }

    fn replace_all(&mut self, from: CellState, to: CellState) {
        self.cells
            .iter_mut()
            .filter(|c| **c == from)
            .for_each(|c| *c = to);
    }

    /// Create a storage for values of type T, one per cell
    pub fn create_storage<T: Default + Clone>(&self) -> CellStorage<T> {
        CellStorage {
            columns: self.columns,
            cells: vec![Default::default(); self.rows * self.columns],
        }
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.cells.chunks(self.columns) {
            for cell in row {
                write!(f, "{}", cell)?;
            }
            write!(f, "\n")?;
        }

        Ok(())
    }
}

/// Serialized form of a [`Grid`]: the cells as a vec of rows
#[derive(Serialize, Deserialize)]
struct GridData {
    cells: Vec<Vec<CellState>>,
}

impl From<Grid> for GridData {
    fn from(grid: Grid) -> Self {
        GridData {
            cells: grid
                .cells
                .chunks(grid.columns)
                .map(|row| row.to_vec())
                .collect(),
        }
    }
}

impl TryFrom<GridData> for Grid {
    type Error = GridError;

    fn try_from(data: GridData) -> Result<Self, Self::Error> {
        let rows = data.cells.len();
        let columns = data.cells.first().map_or(0, Vec::len);
        let mut grid = Grid::new(rows, columns)?;

        for (row, cells) in data.cells.into_iter().enumerate() {
            if cells.len() != columns {
                return Err(GridError::InvalidDimensions {
                    height: rows,
                    width: cells.len(),
                });
            }
            for (col, state) in cells.into_iter().enumerate() {
                let pos = Position::new(row as isize, col as isize);
                let holder = match state {
                    CellState::Start => grid.start,
                    CellState::End => grid.end,
                    _ => None,
                };
                if holder.is_some() {
                    return Err(GridError::DuplicateEndpoint {
                        state,
                        position: pos,
                    });
                }
                grid.set_cell(pos, state)?;
            }
        }

        Ok(grid)
    }
}

/// Per-cell side table with the same shape as the grid it was created from
#[derive(Debug, Clone)]
pub struct CellStorage<T> {
    columns: usize,
    cells: Vec<T>,
}

impl<T: Copy> CellStorage<T> {
    /// Panics if `node` is outside the grid the storage was created from
    pub fn get(&self, node: Position) -> T {
        self.cells[node.row as usize * self.columns + node.col as usize]
    }

    pub fn get_mut(&mut self, node: Position) -> &mut T {
        &mut self.cells[node.row as usize * self.columns + node.col as usize]
    }
}

impl<T: Display> Display for CellStorage<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.cells.chunks(self.columns) {
            for cell in row {
                write!(f, "{}", cell)?;
            }
            write!(f, "\n")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {

    use super::*;

    fn pos(row: isize, col: isize) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn test_new_grid_is_empty() {
        let grid = Grid::new(3, 4).unwrap();

        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.columns(), 4);
        assert!(grid.iter().all(|(_, c)| c == CellState::Empty));
        assert_eq!(grid.iter().count(), 12);
        assert_eq!(grid.start(), None);
        assert_eq!(grid.end(), None);
    }

    #[test]
    fn test_invalid_dimensions() {
        assert_eq!(
            Grid::new(0, 5),
            Err(GridError::InvalidDimensions {
                height: 0,
                width: 5
            })
        );
        assert!(Grid::new(5, 0).is_err());
        assert!(Grid::new(1, 1).is_ok());
    }

    #[test]
    fn test_out_of_bounds() {
        let mut grid = Grid::new(3, 3).unwrap();

        for p in [pos(-1, 0), pos(3, 0), pos(0, -1), pos(0, 3)] {
            assert!(matches!(
                grid.get(p),
                Err(GridError::OutOfBounds { position, .. }) if position == p
            ));
            assert!(grid.set_cell(p, CellState::Barrier).is_err());
            assert!(grid.toggle_barrier(p).is_err());
            assert!(grid.neighbors(p).is_err());
        }
    }

    #[test]
    fn test_single_start_and_end() {
        let mut grid = Grid::new(3, 3).unwrap();

        grid.set_cell(pos(0, 0), CellState::Start).unwrap();
        grid.set_cell(pos(2, 2), CellState::End).unwrap();
        grid.set_cell(pos(1, 1), CellState::Start).unwrap();

        assert_eq!(grid.get(pos(0, 0)).unwrap(), CellState::Empty);
        assert_eq!(grid.get(pos(1, 1)).unwrap(), CellState::Start);
        assert_eq!(grid.start(), Some(pos(1, 1)));
        assert_eq!(grid.end(), Some(pos(2, 2)));

        // setting the same tag twice on the same cell keeps it
        grid.set_cell(pos(1, 1), CellState::Start).unwrap();
        assert_eq!(grid.get(pos(1, 1)).unwrap(), CellState::Start);

        // moving the end onto the start takes the start tag away
        grid.set_cell(pos(1, 1), CellState::End).unwrap();
        assert_eq!(grid.start(), None);
        assert_eq!(grid.end(), Some(pos(1, 1)));
        assert_eq!(grid.get(pos(2, 2)).unwrap(), CellState::Empty);

        let tagged = grid
            .iter()
            .filter(|(_, c)| matches!(c, CellState::Start | CellState::End))
            .count();
        assert_eq!(tagged, 1);
    }

    #[test]
    fn test_oversized_dimensions() {
        assert_eq!(
            Grid::new(1 << 32, 1 << 32),
            Err(GridError::InvalidDimensions {
                height: 1 << 32,
                width: 1 << 32
            })
        );
        assert!(Grid::new(usize::MAX, 2).is_err());
        assert!(Grid::new(1, isize::MAX as usize + 1).is_err());
    }

    #[test]
    fn test_overwrite_clears_tag() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.set_cell(pos(0, 0), CellState::Start).unwrap();
        grid.set_cell(pos(0, 0), CellState::Barrier).unwrap();
        assert_eq!(grid.start(), None);
    }

    #[test]
    fn test_toggle_barrier() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.set_cell(pos(0, 0), CellState::Start).unwrap();
        grid.set_cell(pos(1, 1), CellState::End).unwrap();

        assert_eq!(grid.toggle_barrier(pos(0, 1)).unwrap(), Toggle::Placed);
        assert_eq!(grid.get(pos(0, 1)).unwrap(), CellState::Barrier);
        assert_eq!(grid.toggle_barrier(pos(0, 1)).unwrap(), Toggle::Removed);
        assert_eq!(grid.get(pos(0, 1)).unwrap(), CellState::Empty);

        assert_eq!(grid.toggle_barrier(pos(0, 0)).unwrap(), Toggle::Unchanged);
        assert_eq!(grid.toggle_barrier(pos(1, 1)).unwrap(), Toggle::Unchanged);
        assert_eq!(grid.get(pos(0, 0)).unwrap(), CellState::Start);
        assert_eq!(grid.get(pos(1, 1)).unwrap(), CellState::End);
    }

    #[test]
    fn test_neighbor_order() {
        let grid = Grid::new(3, 3).unwrap();

        let center: Vec<_> = grid.neighbors(pos(1, 1)).unwrap().collect();
        assert_eq!(center, vec![pos(0, 1), pos(2, 1), pos(1, 0), pos(1, 2)]);

        let corner: Vec<_> = grid.neighbors(pos(0, 0)).unwrap().collect();
        assert_eq!(corner, vec![pos(1, 0), pos(0, 1)]);

        let other_corner: Vec<_> = grid.neighbors(pos(2, 2)).unwrap().collect();
        assert_eq!(other_corner, vec![pos(1, 2), pos(2, 1)]);
    }

    #[test]
    fn test_path_markers() {
        let mut grid = Grid::new(1, 4).unwrap();
        grid.set_cell(pos(0, 0), CellState::Start).unwrap();
        grid.set_cell(pos(0, 3), CellState::End).unwrap();
        grid.set_cell(pos(0, 2), CellState::Barrier).unwrap();

        grid.mark_path(&[pos(0, 0), pos(0, 1), pos(0, 2), pos(0, 3), pos(5, 5)]);
        assert_eq!(grid.to_string(), "S.XE\n");

        grid.clear_path();
        assert_eq!(grid.to_string(), "S XE\n");

        grid.mark_path(&[pos(0, 1)]);
        grid.clear_barriers();
        assert_eq!(grid.to_string(), "S  E\n");
    }

    #[test]
    fn test_position_parsing() {
        assert_eq!("3,4".parse::<Position>().unwrap(), pos(3, 4));
        assert_eq!(" -1 , 0".parse::<Position>().unwrap(), pos(-1, 0));
        assert!("3".parse::<Position>().is_err());
        assert!("a,b".parse::<Position>().is_err());
    }

    #[test]
    fn test_serde_keeps_tags() {
        let mut grid = Grid::new(2, 3).unwrap();
        grid.set_cell(pos(0, 0), CellState::Start).unwrap();
        grid.set_cell(pos(1, 2), CellState::End).unwrap();
        grid.set_cell(pos(1, 1), CellState::Barrier).unwrap();

        let json = serde_json::to_string(&grid).unwrap();
        let back: Grid = serde_json::from_str(&json).unwrap();

        assert_eq!(back, grid);
        assert_eq!(back.start(), Some(pos(0, 0)));
        assert_eq!(back.end(), Some(pos(1, 2)));

        let ragged = r#"{"cells":[["Empty","Empty"],["Empty"]]}"#;
        assert!(serde_json::from_str::<Grid>(ragged).is_err());
    }

    #[test]
    fn test_serde_rejects_duplicate_endpoints() {
        let two_starts = r#"{"cells":[["Start","Start"],["Empty","End"]]}"#;
        let err = serde_json::from_str::<Grid>(two_starts).unwrap_err();
        assert!(err.to_string().contains("more than one Start"), "{}", err);

        let two_ends = r#"{"cells":[["Start","End"],["End","Empty"]]}"#;
        assert!(serde_json::from_str::<Grid>(two_ends).is_err());
    }
}
