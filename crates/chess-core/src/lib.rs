//! Core value types for chess.
//!
//! - [`Color`] and [`Piece`] for piece identity
//! - [`Square`], [`File`], and [`Rank`] for board coordinates
//! - [`Move`] for origin/destination pairs with an optional promotion
//! - [`FenFields`] for FEN syntax

mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use fen::{FenError, FenFields, STARTPOS_FEN};
pub use mov::{Move, MoveParseError};
pub use piece::Piece;
pub use square::{File, Rank, Square};
