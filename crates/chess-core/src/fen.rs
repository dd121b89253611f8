//! FEN (Forsyth-Edwards Notation) field splitting and validation.
//!
//! Only the syntax is checked here. Turning the fields into a board is the
//! engine's job, since only it knows the bitboard layout.

use crate::{Color, Piece, Square};
use thiserror::Error;

/// Standard starting position.
pub const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 4 to 6 fields, got {0}")]
    InvalidFieldCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastlingRights(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("invalid move counter: {0}")]
    InvalidCounter(String),
}

/// The decoded fields of a FEN record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenFields {
    /// Occupied squares with their pieces, in rank 8 to rank 1 scan order.
    pub placement: Vec<(Square, Piece, Color)>,
    pub side_to_move: Color,
    /// Castling letters that were present, a subset of `KQkq`.
    pub castling: String,
    pub en_passant: Option<Square>,
    /// Halfmove clock; 0 when the field is omitted.
    pub halfmove_clock: u32,
    /// Fullmove number; 1 when the field is omitted.
    pub fullmove_number: u32,
}

impl FenFields {
    /// Parses a FEN string. The two move counters are optional.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if !(4..=6).contains(&fields.len()) {
            return Err(FenError::InvalidFieldCount(fields.len()));
        }

        let placement = parse_placement(fields[0])?;

        let side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidActiveColor(other.to_string())),
        };

        let castling = fields[2];
        if castling != "-" {
            if let Some(c) = castling.chars().find(|c| !"KQkq".contains(*c)) {
                return Err(FenError::InvalidCastlingRights(format!(
                    "invalid character '{c}'"
                )));
            }
        }

        let en_passant = match fields[3] {
            "-" => None,
            s => Some(
                Square::from_algebraic(s)
                    .ok_or_else(|| FenError::InvalidEnPassantSquare(s.to_string()))?,
            ),
        };

        let counter = |index: usize, default: u32| match fields.get(index) {
            None => Ok(default),
            Some(s) => s
                .parse::<u32>()
                .map_err(|_| FenError::InvalidCounter(s.to_string())),
        };

        Ok(FenFields {
            placement,
            side_to_move,
            castling: if castling == "-" {
                String::new()
            } else {
                castling.to_string()
            },
            en_passant,
            halfmove_clock: counter(4, 0)?,
            fullmove_number: counter(5, 1)?,
        })
    }
}

fn parse_placement(placement: &str) -> Result<Vec<(Square, Piece, Color)>, FenError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::InvalidPiecePlacement(format!(
            "expected 8 ranks, got {}",
            ranks.len()
        )));
    }

    let mut pieces = Vec::with_capacity(32);
    for (row, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - row as u8;
        let mut file = 0u8;
        for c in rank_str.chars() {
            if let Some(skip) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                file += skip as u8;
            } else if let Some((piece, color)) = Piece::from_fen_char(c) {
                if let Some(sq) = Square::from_index(rank * 8 + file).filter(|_| file < 8) {
                    pieces.push((sq, piece, color));
                }
                file += 1;
            } else {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "invalid character '{c}' in rank {}",
                    rank + 1
                )));
            }
            if file > 8 {
                break;
            }
        }
        if file != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "rank {} has {} squares, expected 8",
                rank + 1,
                file
            )));
        }
    }
    Ok(pieces)
}
