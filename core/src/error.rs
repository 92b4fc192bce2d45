use thiserror::Error;

use crate::Coord2;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
    #[error("Coordinates {0:?} are outside the board")]
    OutOfBounds(Coord2),
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("Cell is already revealed and cannot be marked")]
    CellRevealed,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Declared mine count {declared} does not match the {actual} mines on the board")]
    MineCountMismatch { declared: u16, actual: u16 },
}

/// Reasons a board configuration is rejected.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("board must have at least one row and one column")]
    EmptyBoard,
    #[error("row count {0} is outside the allowed range")]
    RowsOutOfRange(u8),
    #[error("column count {0} is outside the allowed range")]
    ColsOutOfRange(u8),
    #[error("at least {min} mines are required, got {mines}")]
    TooFewMines { mines: u16, min: u16 },
    #[error("{mines} mines do not fit in {cells} cells")]
    TooManyMines { mines: u16, cells: u16 },
}

pub type Result<T> = core::result::Result<T, GameError>;
