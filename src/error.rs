use thiserror::Error;

use crate::board::Square;

/// Contract violations raised by the engine.
///
/// Rejected user input (an illegal destination, selecting an empty cell) is
/// never an error; those calls return `Ok(false)`.
#[derive(Debug, Error)]
pub enum CheckersError {
    #[error("coordinate out of range: ({row}, {col})")]
    InvalidCoordinate { row: usize, col: usize },
    #[error("pieces may only stand on dark squares, got {0}")]
    LightSquare(Square),
    #[error("square {0} is already occupied")]
    Occupied(Square),
    #[error("square {0} is empty")]
    EmptySquare(Square),
    #[error("action index {0} is out of range")]
    InvalidAction(usize),
    #[error("no capture continues a chain from {0}")]
    NoContinuation(Square),
    #[error("snapshot lists two pieces on {0}")]
    DuplicateSquare(Square),
    #[error("malformed snapshot: {0}")]
    Snapshot(#[source] serde_json::Error),
    #[error("invalid rules config: {0}")]
    Config(#[source] serde_json::Error),
    #[error("failed to read rules config: {0}")]
    ConfigIo(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CheckersError>;
