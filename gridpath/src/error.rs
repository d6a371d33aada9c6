use thiserror::Error;

use crate::grid::{CellState, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("invalid grid dimensions {height}x{width}")]
    InvalidDimensions { height: usize, width: usize },
    #[error("position {position} is outside the {height}x{width} grid")]
    OutOfBounds {
        position: Position,
        height: usize,
        width: usize,
    },
    #[error("grid has more than one {state:?} cell, another one at {position}")]
    DuplicateEndpoint {
        state: CellState,
        position: Position,
    },
    #[error("both a start and an end cell must be placed before searching for a path")]
    MissingEndpoints,
}
