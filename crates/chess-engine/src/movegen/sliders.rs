//! Ray-cast attacks for bishops, rooks and queens.
//!
//! Each ray runs outward until it leaves the board or reaches the first
//! occupied square, which is included whatever its color. Nothing is cached.

use crate::Bitboard;
use chess_core::Square;

const ORTHOGONAL: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

/// Attacks along the four diagonal rays if `diagonal`, otherwise the four
/// orthogonal ones.
pub fn slider_attacks(sq: Square, occupied: Bitboard, diagonal: bool) -> Bitboard {
    let rays = if diagonal { &DIAGONAL } else { &ORTHOGONAL };
    let mut attacks = Bitboard::EMPTY;
    for &(files, ranks) in rays {
        let mut cursor = sq;
        while let Some(next) = cursor.offset(files, ranks) {
            attacks.set(next);
            if occupied.contains(next) {
                break;
            }
            cursor = next;
        }
    }
    attacks
}

#[inline]
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    slider_attacks(sq, occupied, true)
}

#[inline]
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    slider_attacks(sq, occupied, false)
}

#[inline]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupied) | rook_attacks(sq, occupied)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn set(names: &[&str]) -> Bitboard {
        names.iter().map(|n| sq(n)).collect()
    }

    #[test]
    fn empty_board_reach() {
        assert_eq!(rook_attacks(sq("d4"), Bitboard::EMPTY).count(), 14);
        assert_eq!(bishop_attacks(sq("d4"), Bitboard::EMPTY).count(), 13);
        assert_eq!(bishop_attacks(Square::A1, Bitboard::EMPTY).count(), 7);
        assert_eq!(queen_attacks(sq("d4"), Bitboard::EMPTY).count(), 27);
    }

    #[test]
    fn blocker_is_included_and_stops_the_ray() {
        let occupied = set(&["d6", "f4"]);
        let attacks = rook_attacks(sq("d4"), occupied);
        assert!(attacks.contains(sq("d5")));
        assert!(attacks.contains(sq("d6")));
        assert!(!attacks.contains(sq("d7")));
        assert!(attacks.contains(sq("f4")));
        assert!(!attacks.contains(sq("g4")));
        assert!(attacks.contains(sq("a4")));
        assert!(attacks.contains(sq("d1")));
    }

    #[test]
    fn diagonal_blockers() {
        let attacks = bishop_attacks(Square::C1, set(&["e3", "b2"]));
        assert_eq!(attacks, set(&["d2", "e3", "b2"]));
    }

    #[test]
    fn rays_do_not_wrap_files() {
        let attacks = rook_attacks(Square::H1, Bitboard::EMPTY);
        assert!(!attacks.contains(sq("a2")));
        assert!(attacks.contains(Square::A1));
        assert!(attacks.contains(Square::H8));
    }
}
