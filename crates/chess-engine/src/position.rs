//! Board state: twelve piece bitboards plus side to move, castling rights
//! and the en-passant slot.

use chess_core::{Color, FenFields, Piece, Square};

use crate::castling::{CastlePath, CastlingRights};
use crate::movegen::is_king_attacked;
use crate::{Bitboard, EngineError};

/// One bitboard per (color, piece kind), indexed `[color][piece]`.
pub type PieceBoards = [[Bitboard; 6]; 2];

/// Complete board state.
///
/// `Position` is `Copy`: legality checks play candidate moves on a scratch
/// copy, and the game journal snapshots it whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pieces: PieceBoards,

    /// The side to move.
    pub side_to_move: Color,

    /// Castling rights.
    pub castling: CastlingRights,

    /// En passant target square. Carried through snapshots and FEN but never
    /// set or read by move generation.
    pub en_passant: Option<Square>,
}

impl Position {
    /// An empty board, White to move, no rights.
    pub fn empty() -> Self {
        Position {
            pieces: [[Bitboard::EMPTY; 6]; 2],
            side_to_move: Color::White,
            castling: CastlingRights::NONE,
            en_passant: None,
        }
    }

    /// The standard starting position.
    pub fn startpos() -> Self {
        let mut position = Position::empty();
        let back_rank = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        for (file, piece) in back_rank.into_iter().enumerate() {
            for color in Color::ALL {
                let home = match color {
                    Color::White => Square::A1,
                    Color::Black => Square::A8,
                };
                let pawn_row = match color {
                    Color::White => 1,
                    Color::Black => -1,
                };
                if let Some(sq) = home.offset(file as i8, 0) {
                    position.put(sq, piece, color);
                }
                if let Some(sq) = home.offset(file as i8, pawn_row) {
                    position.put(sq, Piece::Pawn, color);
                }
            }
        }
        position.castling = CastlingRights::ALL;
        position
    }

    /// Builds a position from raw piece masks. Call [`validate`] before
    /// searching it.
    ///
    /// [`validate`]: Position::validate
    pub fn from_parts(
        pieces: PieceBoards,
        side_to_move: Color,
        castling: CastlingRights,
        en_passant: Option<Square>,
    ) -> Self {
        Position {
            pieces,
            side_to_move,
            castling,
            en_passant,
        }
    }

    /// Parses a FEN string. The move counters are accepted but not kept.
    pub fn from_fen(fen: &str) -> Result<Self, EngineError> {
        let fields = FenFields::parse(fen)?;
        let mut position = Position::empty();
        for (sq, piece, color) in fields.placement {
            position.put(sq, piece, color);
        }
        position.side_to_move = fields.side_to_move;
        position.castling = CastlingRights::from_fen(&fields.castling);
        position.en_passant = fields.en_passant;
        Ok(position)
    }

    /// Serializes to FEN with zeroed move counters (`0 1`).
    pub fn to_fen(&self) -> String {
        let mut placement = String::new();
        for rank in (0..8u8).rev() {
            let mut gap = 0;
            for file in 0..8u8 {
                let piece = Square::from_index(rank * 8 + file).and_then(|sq| self.piece_at(sq));
                match piece {
                    Some((piece, color)) => {
                        if gap > 0 {
                            placement.push_str(&gap.to_string());
                            gap = 0;
                        }
                        placement.push(piece.to_fen_char(color));
                    }
                    None => gap += 1,
                }
            }
            if gap > 0 {
                placement.push_str(&gap.to_string());
            }
            if rank > 0 {
                placement.push('/');
            }
        }

        let side = match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        };
        let en_passant = self
            .en_passant
            .map_or_else(|| "-".to_string(), Square::to_algebraic);
        format!(
            "{placement} {side} {} {en_passant} 0 1",
            self.castling.to_fen()
        )
    }

    /// All twelve piece masks.
    #[inline]
    pub fn piece_boards(&self) -> &PieceBoards {
        &self.pieces
    }

    /// Squares holding `color`'s pieces of kind `piece`.
    #[inline]
    pub fn pieces_of(&self, piece: Piece, color: Color) -> Bitboard {
        self.pieces[color.index()][piece.index()]
    }

    /// Squares holding any of `color`'s pieces.
    #[inline]
    pub fn color_occupancy(&self, color: Color) -> Bitboard {
        self.pieces[color.index()]
            .iter()
            .fold(Bitboard::EMPTY, |acc, &bb| acc | bb)
    }

    /// Squares holding any piece.
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.color_occupancy(Color::White) | self.color_occupancy(Color::Black)
    }

    /// The piece kind `color` has on `sq`, if any.
    #[inline]
    pub fn piece_of(&self, color: Color, sq: Square) -> Option<Piece> {
        Piece::ALL
            .into_iter()
            .find(|&piece| self.pieces_of(piece, color).contains(sq))
    }

    /// The piece and its color on `sq`, if any.
    pub fn piece_at(&self, sq: Square) -> Option<(Piece, Color)> {
        Color::ALL
            .into_iter()
            .find_map(|color| self.piece_of(color, sq).map(|piece| (piece, color)))
    }

    /// The square of `color`'s king, or `None` if it has none.
    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces_of(Piece::King, color).lsb()
    }

    /// Places a piece, without clearing whatever else is on the square.
    #[inline]
    pub fn put(&mut self, sq: Square, piece: Piece, color: Color) {
        self.pieces[color.index()][piece.index()].set(sq);
    }

    /// Clears every piece mask at `sq`.
    pub fn remove(&mut self, sq: Square) {
        for boards in &mut self.pieces {
            for bb in boards.iter_mut() {
                bb.clear(sq);
            }
        }
    }

    /// Checks the structural invariants a search relies on: no square in two
    /// masks, exactly one king per side, and the side that just moved not
    /// left in check.
    pub fn validate(&self) -> Result<(), EngineError> {
        let mut seen = Bitboard::EMPTY;
        for color in Color::ALL {
            for piece in Piece::ALL {
                let bb = self.pieces_of(piece, color);
                if let Some(sq) = (seen & bb).lsb() {
                    return Err(EngineError::InvalidPosition(format!(
                        "square {sq} is claimed by more than one piece"
                    )));
                }
                seen |= bb;
            }
        }

        for color in Color::ALL {
            match self.pieces_of(Piece::King, color).count() {
                0 => return Err(EngineError::MissingKing(color)),
                1 => {}
                n => {
                    return Err(EngineError::InvalidPosition(format!(
                        "{color} has {n} kings"
                    )))
                }
            }
        }

        let waiting = self.side_to_move.opposite();
        if is_king_attacked(self, waiting) {
            return Err(EngineError::InvalidPosition(format!(
                "{waiting} is in check but it is {}'s turn",
                self.side_to_move
            )));
        }
        Ok(())
    }

    /// Moves `piece` of the side to move from `from` to `to`, then passes the
    /// turn. Returns the kind captured on `to`, if any.
    ///
    /// The caller guarantees `piece` stands on `from` and `to` is not
    /// occupied by the mover. A pawn reaching its last rank becomes
    /// `promotion`. Castling rights shrink on king moves, rook moves from a
    /// home corner and captures on a home corner; the king moves `e1g1`,
    /// `e1c1`, `e8g8`, `e8c8` also carry the rook across.
    pub(crate) fn play(
        &mut self,
        piece: Piece,
        from: Square,
        to: Square,
        promotion: Piece,
    ) -> Option<Piece> {
        let us = self.side_to_move;
        let them = us.opposite();
        let captured = self.piece_of(them, to);

        self.pieces[us.index()][piece.index()].clear(from);
        let placed = if piece == Piece::Pawn && to.rank() == us.promotion_rank() {
            promotion
        } else {
            piece
        };
        self.pieces[us.index()][placed.index()].set(to);
        if let Some(kind) = captured {
            self.pieces[them.index()][kind.index()].clear(to);
        }

        match piece {
            Piece::King => {
                self.castling.revoke_all(us);
                if let Some(path) = CastlePath::matching(us, from, to) {
                    let rooks = &mut self.pieces[us.index()][Piece::Rook.index()];
                    rooks.clear(path.rook_from);
                    rooks.set(path.rook_to);
                }
            }
            Piece::Rook => {
                if let Some(side) = CastlePath::rook_home(us, from) {
                    self.castling.revoke(us, side);
                }
            }
            _ => {}
        }
        if captured.is_some() {
            if let Some(side) = CastlePath::rook_home(them, to) {
                self.castling.revoke(them, side);
            }
        }

        self.side_to_move = them;
        captured
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::castling::CastleSide;
    use chess_core::{File, Rank, STARTPOS_FEN};

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    #[test]
    fn startpos_matches_fen() {
        let pos = Position::startpos();
        assert_eq!(pos.to_fen(), STARTPOS_FEN);
        assert_eq!(Position::from_fen(STARTPOS_FEN).unwrap(), pos);
    }

    #[test]
    fn fen_round_trip() {
        let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 0 1";
        assert_eq!(Position::from_fen(fen).unwrap().to_fen(), fen);

        let with_ep = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        let pos = Position::from_fen(with_ep).unwrap();
        assert_eq!(pos.en_passant, Some(sq("e3")));
        assert_eq!(pos.to_fen(), with_ep);
    }

    #[test]
    fn startpos_layout() {
        let pos = Position::startpos();
        assert_eq!(pos.piece_at(Square::E1), Some((Piece::King, Color::White)));
        assert_eq!(pos.piece_at(Square::D8), Some((Piece::Queen, Color::Black)));
        assert_eq!(pos.piece_at(Square::new(File::E, Rank::R4)), None);
        assert_eq!(pos.pieces_of(Piece::Pawn, Color::White), Bitboard::rank(Rank::R2));
        assert_eq!(pos.pieces_of(Piece::Pawn, Color::Black), Bitboard::rank(Rank::R7));
        assert_eq!(pos.occupied().count(), 32);
        assert_eq!(pos.color_occupancy(Color::Black).count(), 16);
        assert_eq!(pos.king_square(Color::Black), Some(Square::E8));
        assert!(pos.validate().is_ok());
    }

    #[test]
    fn bad_fen_is_an_error() {
        assert!(matches!(
            Position::from_fen("not a fen"),
            Err(EngineError::Fen(_))
        ));
    }

    #[test]
    fn validate_rejects_missing_king() {
        let pos = Position::from_fen("8/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(pos.validate(), Err(EngineError::MissingKing(Color::Black)));
    }

    #[test]
    fn validate_rejects_two_kings() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/K3K3 w - - 0 1").unwrap();
        assert!(matches!(
            pos.validate(),
            Err(EngineError::InvalidPosition(_))
        ));
    }

    #[test]
    fn validate_rejects_overlap() {
        let mut pos = Position::startpos();
        pos.put(Square::E1, Piece::Queen, Color::Black);
        assert!(matches!(
            pos.validate(),
            Err(EngineError::InvalidPosition(_))
        ));
    }

    #[test]
    fn validate_rejects_waiting_side_in_check() {
        // White to move while the black king is attacked by the rook.
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/K3R3 w - - 0 1").unwrap();
        assert!(matches!(
            pos.validate(),
            Err(EngineError::InvalidPosition(_))
        ));
    }

    #[test]
    fn play_capture_clears_victim() {
        let mut pos =
            Position::from_fen("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1").unwrap();
        let captured = pos.play(Piece::Pawn, sq("e4"), sq("d5"), Piece::Queen);
        assert_eq!(captured, Some(Piece::Pawn));
        assert_eq!(pos.piece_at(sq("d5")), Some((Piece::Pawn, Color::White)));
        assert!(pos.pieces_of(Piece::Pawn, Color::Black).is_empty());
        assert_eq!(pos.side_to_move, Color::Black);
    }

    #[test]
    fn play_castle_moves_rook_and_clears_rights() {
        let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        pos.play(Piece::King, Square::E1, Square::G1, Piece::Queen);
        assert_eq!(pos.piece_at(Square::G1), Some((Piece::King, Color::White)));
        assert_eq!(pos.piece_at(Square::F1), Some((Piece::Rook, Color::White)));
        assert_eq!(pos.piece_at(Square::H1), None);
        assert!(!pos.castling.allows(Color::White, CastleSide::King));
        assert!(!pos.castling.allows(Color::White, CastleSide::Queen));
        assert!(pos.castling.allows(Color::Black, CastleSide::King));
    }

    #[test]
    fn play_rook_and_corner_capture_revoke_rights() {
        let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        // Ra1xa8 drops white's queen-side right and black's queen-side right.
        pos.play(Piece::Rook, Square::A1, Square::A8, Piece::Queen);
        assert!(!pos.castling.allows(Color::White, CastleSide::Queen));
        assert!(!pos.castling.allows(Color::Black, CastleSide::Queen));
        assert!(pos.castling.allows(Color::White, CastleSide::King));
        assert!(pos.castling.allows(Color::Black, CastleSide::King));
    }
}
