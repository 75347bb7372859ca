//! Typed errors for grid access and swap input

use thiserror::Error;

use crate::types::Position;

/// Grid store failures. Bounds violations never panic; they surface here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("position {0} is outside the grid")]
    OutOfBounds(Position),
    #[error("cell {0} is already occupied")]
    Occupied(Position),
    #[error("cell {0} is empty")]
    Empty(Position),
    #[error("grid text must have {rows} rows of {cols} cells")]
    BadShape { rows: usize, cols: usize },
    #[error("unknown tile letter {letter:?} at {position}")]
    UnknownLetter { letter: char, position: Position },
}

/// Rejected player swaps. Raised before any state is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SwapError {
    #[error("swap position {0} is outside the grid")]
    OutOfBounds(Position),
    #[error("swap positions {a} and {b} are not adjacent")]
    NotAdjacent { a: Position, b: Position },
    #[error("cannot swap {0} with itself")]
    SameCell(Position),
    #[error("a turn is still resolving")]
    TurnInProgress,
}
