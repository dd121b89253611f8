//! Move generation.
//!
//! Moves are produced per origin square: [`pseudo_moves`] follows the
//! movement rules, and [`legal_moves`] plays each candidate on a scratch copy
//! of the position and drops the ones that leave the mover's king attacked.
//! Destinations come back as a [`Bitboard`], so iterating them yields
//! ascending square order.
//!
//! En passant captures are never generated.

mod attacks;
mod check;
pub mod perft;
mod sliders;

use crate::castling::{CastlePath, CastleSide};
use crate::{Bitboard, EngineError, Position};
use chess_core::{Color, Move, Piece, Square};

pub use attacks::{init_attack_tables, king_attacks, knight_attacks, pawn_attacks};
pub use check::{in_check, is_king_attacked, is_square_attacked};
pub use sliders::{bishop_attacks, queen_attacks, rook_attacks, slider_attacks};

/// A list of moves with a fixed maximum capacity.
///
/// Chess positions have at most 218 legal moves, so a fixed-size array
/// avoids heap allocation at every search node.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    /// Maximum number of legal moves in any chess position, rounded up.
    pub const MAX_MOVES: usize = 256;

    const FILLER: Move = Move::new(Square::A1, Square::A1);

    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [Self::FILLER; Self::MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, m: Move) {
        debug_assert!(self.len < Self::MAX_MOVES);
        self.moves[self.len] = m;
        self.len += 1;
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Move {
        &self.as_slice()[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Terminal classification of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// The side to move has at least one legal move.
    Ongoing,
    /// The side to move has no legal move and its king is attacked.
    Checkmate,
    /// The side to move has no legal move and its king is safe.
    Stalemate,
}

/// Destinations the piece on `from` may reach by its movement rules,
/// ignoring whether its own king ends up attacked.
///
/// Empty when `from` is empty or holds a piece of the side not to move.
pub fn pseudo_moves(position: &Position, from: Square) -> Bitboard {
    let us = position.side_to_move;
    let Some(piece) = position.piece_of(us, from) else {
        return Bitboard::EMPTY;
    };
    let own = position.color_occupancy(us);
    let occupied = position.occupied();

    match piece {
        Piece::Pawn => pawn_targets(position, from, us, occupied),
        Piece::Knight => knight_attacks(from) & !own,
        Piece::Bishop => bishop_attacks(from, occupied) & !own,
        Piece::Rook => rook_attacks(from, occupied) & !own,
        Piece::Queen => queen_attacks(from, occupied) & !own,
        Piece::King => (king_attacks(from) & !own) | castle_targets(position, from, us, occupied),
    }
}

/// Single push, double push from the home rank through an empty square,
/// and diagonal captures onto enemy pieces.
fn pawn_targets(position: &Position, from: Square, us: Color, occupied: Bitboard) -> Bitboard {
    let mut targets = pawn_attacks(from, us) & position.color_occupancy(us.opposite());

    let step = us.forward();
    if let Some(one) = from.offset(0, step).filter(|sq| !occupied.contains(*sq)) {
        targets.set(one);
        if from.rank() == us.pawn_rank() {
            if let Some(two) = one.offset(0, step).filter(|sq| !occupied.contains(*sq)) {
                targets.set(two);
            }
        }
    }
    targets
}

/// Castling destinations for a king standing on its home square.
///
/// Rights are trusted as given; the rook's presence is not re-checked.
/// They are already gone once a rook is captured on its corner (see
/// `Position::play`), so no castle is offered toward an empty corner after
/// such a capture.
fn castle_targets(position: &Position, from: Square, us: Color, occupied: Bitboard) -> Bitboard {
    let mut targets = Bitboard::EMPTY;
    for side in CastleSide::BOTH {
        let path = CastlePath::of(us, side);
        if from != path.king_from || !position.castling.allows(us, side) {
            continue;
        }
        if (occupied & path.between).is_not_empty() {
            continue;
        }
        let them = us.opposite();
        if path
            .king_walk
            .iter()
            .any(|&sq| is_square_attacked(position, sq, them))
        {
            continue;
        }
        targets.set(path.king_to);
    }
    targets
}

/// Destinations from `from` that do not leave the mover's king attacked,
/// in ascending square order.
pub fn legal_moves(position: &Position, from: Square) -> Bitboard {
    let us = position.side_to_move;
    let Some(piece) = position.piece_of(us, from) else {
        return Bitboard::EMPTY;
    };
    pseudo_moves(position, from)
        .into_iter()
        .filter(|&to| {
            let mut scratch = *position;
            scratch.play(piece, from, to, Piece::Queen);
            !is_king_attacked(&scratch, us)
        })
        .collect()
}

/// Every legal move of the side to move, ordered by origin then
/// destination square. No move carries a promotion choice.
pub fn generate_moves(position: &Position) -> MoveList {
    let mut moves = MoveList::new();
    for from in position.color_occupancy(position.side_to_move) {
        for to in legal_moves(position, from) {
            moves.push(Move::new(from, to));
        }
    }
    moves
}

/// Returns true if the side to move has any legal move.
pub fn has_legal_move(position: &Position) -> bool {
    position
        .color_occupancy(position.side_to_move)
        .into_iter()
        .any(|from| legal_moves(position, from).is_not_empty())
}

/// Classifies the position as checkmate, stalemate or ongoing.
pub fn game_status(position: &Position) -> Result<GameStatus, EngineError> {
    let checked = in_check(position)?;
    Ok(match (has_legal_move(position), checked) {
        (true, _) => GameStatus::Ongoing,
        (false, true) => GameStatus::Checkmate,
        (false, false) => GameStatus::Stalemate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CastlingRights;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn set(names: &[&str]) -> Bitboard {
        names.iter().map(|n| sq(n)).collect()
    }

    fn fen(s: &str) -> Position {
        Position::from_fen(s).unwrap()
    }

    #[test]
    fn movelist_push_and_index() {
        let mut list = MoveList::new();
        assert!(list.is_empty());
        let m1 = Move::new(sq("e2"), sq("e4"));
        let m2 = Move::new(sq("d2"), sq("d4"));
        list.push(m1);
        list.push(m2);
        assert_eq!(list.len(), 2);
        assert_eq!(list[0], m1);
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![m1, m2]);
    }

    #[test]
    fn startpos_has_twenty_moves() {
        let moves = generate_moves(&Position::startpos());
        assert_eq!(moves.len(), 20);
        let knight_moves = moves.iter().filter(|m| m.from() == Square::G1).count();
        assert_eq!(knight_moves, 2);
    }

    #[test]
    fn moves_are_sorted() {
        let moves = generate_moves(&Position::startpos());
        assert!(moves.as_slice().windows(2).all(|w| w[0] < w[1]));
        assert_eq!(moves[0], Move::new(Square::B1, sq("a3")));
    }

    #[test]
    fn black_moves_from_startpos() {
        let mut pos = Position::startpos();
        pos.side_to_move = Color::Black;
        assert_eq!(generate_moves(&pos).len(), 20);
        assert_eq!(legal_moves(&pos, sq("e7")), set(&["e6", "e5"]));
        assert!(legal_moves(&pos, sq("e2")).is_empty());
    }

    #[test]
    fn pawn_pushes_and_captures() {
        let pos = fen("4k3/8/8/8/8/3p1b2/4P3/4K3 w - - 0 1");
        assert_eq!(legal_moves(&pos, sq("e2")), set(&["d3", "e3", "e4", "f3"]));

        // Blocked double push.
        let pos = fen("4k3/8/8/8/4n3/8/4P3/4K3 w - - 0 1");
        assert_eq!(legal_moves(&pos, sq("e2")), set(&["e3"]));

        // Blocked single push blocks the double push too.
        let pos = fen("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1");
        assert!(legal_moves(&pos, sq("e2")).is_empty());

        // No double push off the home rank.
        let pos = fen("4k3/8/8/8/8/4P3/8/4K3 w - - 0 1");
        assert_eq!(legal_moves(&pos, sq("e3")), set(&["e4"]));
    }

    #[test]
    fn pawn_never_captures_forward_or_own_pieces() {
        let pos = fen("4k3/8/8/8/4p3/3NP3/8/4K3 w - - 0 1");
        assert!(legal_moves(&pos, sq("e3")).is_empty());
    }

    #[test]
    fn en_passant_is_never_generated() {
        let pos = fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1");
        assert_eq!(legal_moves(&pos, sq("e5")), set(&["e6"]));
    }

    #[test]
    fn promotion_push_is_a_single_destination() {
        let pos = fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        assert_eq!(legal_moves(&pos, sq("a7")), set(&["a8"]));
    }

    #[test]
    fn pinned_piece_cannot_leave_the_line() {
        let pos = fen("4r1k1/8/8/8/8/8/4B3/4K3 w - - 0 1");
        assert!(legal_moves(&pos, sq("e2")).is_empty());
        assert_eq!(pseudo_moves(&pos, sq("e2")).count(), 9);
    }

    #[test]
    fn king_cannot_step_into_attack() {
        let pos = fen("4k3/8/8/8/8/8/r7/4K3 w - - 0 1");
        assert_eq!(legal_moves(&pos, Square::E1), set(&["d1", "f1"]));
    }

    #[test]
    fn only_side_to_move_generates() {
        let pos = Position::startpos();
        assert!(pseudo_moves(&pos, sq("e7")).is_empty());
        assert!(pseudo_moves(&pos, sq("e4")).is_empty());
    }

    #[test]
    fn castling_offered_with_rights_and_clear_path() {
        let pos = fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1");
        assert_eq!(legal_moves(&pos, Square::E1), set(&["c1", "d1", "f1", "g1"]));

        let mut black = pos;
        black.side_to_move = Color::Black;
        assert_eq!(legal_moves(&black, Square::E8), set(&["c8", "d8", "f8", "g8"]));
    }

    #[test]
    fn castling_requires_rights() {
        let mut pos = fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w - - 0 1");
        assert_eq!(legal_moves(&pos, Square::E1), set(&["d1", "f1"]));
        pos.castling = CastlingRights::new(CastlingRights::WHITE_QUEENSIDE);
        assert_eq!(legal_moves(&pos, Square::E1), set(&["c1", "d1", "f1"]));
    }

    #[test]
    fn castling_requires_empty_path() {
        // Knight on b1 blocks the queen side even though b1 is not walked.
        let pos = fen("4k3/8/8/8/8/8/8/RN2K2R w KQ - 0 1");
        assert_eq!(legal_moves(&pos, Square::E1), set(&["d1", "d2", "e2", "f1", "f2", "g1"]));
    }

    #[test]
    fn castling_blocked_by_attacks() {
        // Rook on f8 covers f1: no king-side castle, queen side still fine.
        let pos = fen("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        let moves = legal_moves(&pos, Square::E1);
        assert!(!moves.contains(Square::G1));
        assert!(moves.contains(Square::C1));

        // In check: no castling at all.
        let pos = fen("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        let moves = legal_moves(&pos, Square::E1);
        assert!(!moves.contains(Square::G1));
        assert!(!moves.contains(Square::C1));

        // Attacked destination.
        let pos = fen("2r1k3/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        let moves = legal_moves(&pos, Square::E1);
        assert!(!moves.contains(Square::C1));
        assert!(moves.contains(Square::G1));
    }

    #[test]
    fn queen_side_b_file_attack_does_not_matter() {
        let pos = fen("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1");
        assert!(legal_moves(&pos, Square::E1).contains(Square::C1));
    }

    #[test]
    fn no_castle_toward_a_captured_corner_rook() {
        let mut pos = fen("4k3/8/8/8/8/8/6b1/R3K2R b KQ - 0 1");
        pos.play(Piece::Bishop, sq("g2"), Square::H1, Piece::Queen);
        let moves = legal_moves(&pos, Square::E1);
        assert!(!moves.contains(Square::G1));
        assert!(moves.contains(Square::C1));
    }

    #[test]
    fn castling_only_from_home_square() {
        let pos = fen("4k3/8/8/8/8/8/8/R2K3R w KQ - 0 1");
        let moves = legal_moves(&pos, Square::D1);
        assert!(!moves.contains(Square::B1));
        assert!(!moves.contains(Square::F1));
        assert!(moves.contains(Square::C1));
    }

    #[test]
    fn legal_moves_never_leave_king_attacked() {
        let pos = fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
        for m in &generate_moves(&pos) {
            let mut after = pos;
            let piece = after.piece_of(Color::White, m.from()).unwrap();
            after.play(piece, m.from(), m.to(), Piece::Queen);
            assert!(!is_king_attacked(&after, Color::White), "{m}");
        }
    }

    #[test]
    fn checkmate_and_stalemate() {
        let mate = fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
        assert_eq!(game_status(&mate), Ok(GameStatus::Checkmate));

        let stale = fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        assert_eq!(game_status(&stale), Ok(GameStatus::Stalemate));

        assert_eq!(game_status(&Position::startpos()), Ok(GameStatus::Ongoing));
    }

    #[test]
    fn game_status_rejects_missing_king() {
        let pos = fen("4k3/8/8/8/8/8/8/8 w - - 0 1");
        assert_eq!(game_status(&pos), Err(EngineError::MissingKing(Color::White)));
        assert!(generate_moves(&pos).is_empty());
    }
}
