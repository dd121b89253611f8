//! Move representation.

use crate::{Piece, Square};
use std::fmt;
use thiserror::Error;

/// Errors from parsing a move in coordinate notation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoveParseError {
    #[error("expected 4 or 5 characters, got {0}")]
    InvalidLength(usize),

    #[error("invalid square '{0}'")]
    InvalidSquare(String),

    #[error("invalid promotion piece '{0}'")]
    InvalidPromotion(char),
}

/// A move: origin, destination, and an optional promotion choice.
///
/// Move generation never fills in `promotion`; applying a pawn move to the
/// last rank without a choice promotes to a queen.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Move {
    from: Square,
    to: Square,
    promotion: Option<Piece>,
}

impl Move {
    /// Creates a move without a promotion choice.
    #[inline]
    pub const fn new(from: Square, to: Square) -> Self {
        Move {
            from,
            to,
            promotion: None,
        }
    }

    /// Creates a move that promotes to `piece` if it is a pawn reaching
    /// the last rank.
    #[inline]
    pub const fn with_promotion(from: Square, to: Square, piece: Piece) -> Self {
        Move {
            from,
            to,
            promotion: Some(piece),
        }
    }

    #[inline]
    pub const fn from(self) -> Square {
        self.from
    }

    #[inline]
    pub const fn to(self) -> Square {
        self.to
    }

    #[inline]
    pub const fn promotion(self) -> Option<Piece> {
        self.promotion
    }

    /// Coordinate notation, e.g. `e2e4` or `e7e8n`.
    pub fn to_uci(self) -> String {
        match self.promotion {
            Some(piece) => format!("{}{}{}", self.from, self.to, piece.letter()),
            None => format!("{}{}", self.from, self.to),
        }
    }

    /// Parses coordinate notation.
    pub fn from_uci(s: &str) -> Result<Self, MoveParseError> {
        if !(4..=5).contains(&s.len()) || !s.is_ascii() {
            return Err(MoveParseError::InvalidLength(s.chars().count()));
        }
        let square = |part: &str| {
            Square::from_algebraic(part).ok_or_else(|| MoveParseError::InvalidSquare(part.into()))
        };
        let from = square(&s[0..2])?;
        let to = square(&s[2..4])?;
        match s[4..].chars().next() {
            None => Ok(Move::new(from, to)),
            Some(c) => match Piece::from_letter(c) {
                Some(piece) if piece.is_promotion_target() => {
                    Ok(Move::with_promotion(from, to, piece))
                }
                _ => Err(MoveParseError::InvalidPromotion(c)),
            },
        }
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({})", self.to_uci())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uci())
    }
}
