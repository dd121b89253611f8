//! Attack and check detection.

use super::attacks::{king_attacks, knight_attacks, pawn_attacks};
use super::sliders::{bishop_attacks, rook_attacks};
use crate::{EngineError, Position};
use chess_core::{Color, Piece, Square};

/// Returns true if any of `by_color`'s pieces attacks `sq`.
///
/// Pawns are found through the reverse table: a `by_color` pawn attacks `sq`
/// exactly when a pawn of the other color on `sq` would attack it.
pub fn is_square_attacked(position: &Position, sq: Square, by_color: Color) -> bool {
    let theirs = |piece| position.pieces_of(piece, by_color);

    if (pawn_attacks(sq, by_color.opposite()) & theirs(Piece::Pawn)).is_not_empty()
        || (knight_attacks(sq) & theirs(Piece::Knight)).is_not_empty()
        || (king_attacks(sq) & theirs(Piece::King)).is_not_empty()
    {
        return true;
    }

    let occupied = position.occupied();
    let queens = theirs(Piece::Queen);
    (bishop_attacks(sq, occupied) & (theirs(Piece::Bishop) | queens)).is_not_empty()
        || (rook_attacks(sq, occupied) & (theirs(Piece::Rook) | queens)).is_not_empty()
}

/// Returns true if `color`'s king is attacked.
///
/// A side with no king counts as attacked, so the legality filter leaves it
/// no moves. Use [`in_check`] where a missing king must be an error.
pub fn is_king_attacked(position: &Position, color: Color) -> bool {
    match position.king_square(color) {
        Some(sq) => is_square_attacked(position, sq, color.opposite()),
        None => true,
    }
}

/// Returns whether the side to move is in check.
pub fn in_check(position: &Position) -> Result<bool, EngineError> {
    let us = position.side_to_move;
    let king = position
        .king_square(us)
        .ok_or(EngineError::MissingKing(us))?;
    Ok(is_square_attacked(position, king, us.opposite()))
}
