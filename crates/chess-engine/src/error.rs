//! Engine error type.

use chess_core::{Color, FenError};
use thiserror::Error;

/// Errors reported by position setup, check detection and search.
///
/// Illegal move requests are not errors: `GameState::apply_move` reports
/// them through [`MoveOutcome`](crate::MoveOutcome).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid position: no {0} king on the board")]
    MissingKing(Color),

    #[error("invalid position: {0}")]
    InvalidPosition(String),

    #[error("cannot search for {requested}: it is {to_move}'s turn")]
    NotSideToMove { requested: Color, to_move: Color },

    #[error(transparent)]
    Fen(#[from] FenError),
}
