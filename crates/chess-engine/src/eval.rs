//! Static material evaluation.

use crate::Position;
use chess_core::{Color, Piece};

/// Material weight of each piece kind. The king is never traded, so it is
/// worth nothing.
pub const fn piece_value(piece: Piece) -> i32 {
    match piece {
        Piece::Pawn => 1,
        Piece::Knight => 3,
        Piece::Bishop => 3,
        Piece::Rook => 5,
        Piece::Queen => 11,
        Piece::King => 0,
    }
}

/// Total material `color` has on the board.
pub fn material(position: &Position, color: Color) -> i32 {
    Piece::ALL
        .iter()
        .map(|&piece| piece_value(piece) * position.pieces_of(piece, color).count() as i32)
        .sum()
}

/// White's material minus Black's, regardless of whose turn it is.
pub fn evaluate(position: &Position) -> i32 {
    material(position, Color::White) - material(position, Color::Black)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_is_balanced() {
        let pos = Position::startpos();
        assert_eq!(material(&pos, Color::White), 8 + 6 + 6 + 10 + 11);
        assert_eq!(evaluate(&pos), 0);
    }

    #[test]
    fn score_is_white_minus_black() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/R2QK3 w - - 0 1").unwrap();
        assert_eq!(evaluate(&pos), 16);

        let pos = Position::from_fen("3qk1n1/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(evaluate(&pos), -14);

        // Side to move does not flip the sign.
        let mut black = pos;
        black.side_to_move = Color::Black;
        assert_eq!(evaluate(&black), -14);
    }
}
