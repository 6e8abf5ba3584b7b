use thiserror::Error;

/// Why a UI command was rejected before reaching the session
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("move direction must be -1 or 1, got {0}")]
    InvalidDirection(i32),

    #[error("cell ({x}, {y}) is outside the {cols}x{rows} grid")]
    CellOutOfBounds {
        x: usize,
        y: usize,
        cols: usize,
        rows: usize,
    },

    #[error("game session is no longer running")]
    SessionClosed,
}
