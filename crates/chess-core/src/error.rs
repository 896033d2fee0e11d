use thiserror::Error;

use crate::protocol::ErrorCode;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("Invalid FEN: {0}")]
    InvalidFen(String),

    #[error("Invalid move format: {0}")]
    InvalidMoveFormat(String),

    #[error("Illegal move: {0}")]
    IllegalMove(String),
}

impl CoreError {
    /// Wire code reported for this failure.
    /// A malformed move and an illegal one are indistinguishable to the caller.
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::InvalidFen(_) => ErrorCode::InvalidFen,
            CoreError::InvalidMoveFormat(_) | CoreError::IllegalMove(_) => {
                ErrorCode::IllegalClientMove
            }
        }
    }
}
