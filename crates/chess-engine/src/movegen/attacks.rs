//! Leaper attack tables: knight, king, and pawn captures.
//!
//! Built once from offset deltas on first use and shared read-only for the
//! life of the process.

use crate::Bitboard;
use chess_core::{Color, Square};
use std::sync::OnceLock;

/// (file, rank) steps of a knight.
const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// (file, rank) steps of a king.
const KING_DELTAS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// Diagonal capture steps, indexed by color.
const PAWN_CAPTURE_DELTAS: [[(i8, i8); 2]; 2] = [[(-1, 1), (1, 1)], [(-1, -1), (1, -1)]];

struct LeaperTables {
    knight: [Bitboard; 64],
    king: [Bitboard; 64],
    pawn: [[Bitboard; 64]; 2],
}

static LEAPERS: OnceLock<LeaperTables> = OnceLock::new();

impl LeaperTables {
    fn build() -> Self {
        let mut tables = LeaperTables {
            knight: [Bitboard::EMPTY; 64],
            king: [Bitboard::EMPTY; 64],
            pawn: [[Bitboard::EMPTY; 64]; 2],
        };
        for sq in Square::all() {
            let i = sq.index() as usize;
            tables.knight[i] = targets(sq, &KNIGHT_DELTAS);
            tables.king[i] = targets(sq, &KING_DELTAS);
            for color in Color::ALL {
                tables.pawn[color.index()][i] = targets(sq, &PAWN_CAPTURE_DELTAS[color.index()]);
            }
        }
        tables
    }
}

/// On-board squares reached from `sq` by each delta.
fn targets(sq: Square, deltas: &[(i8, i8)]) -> Bitboard {
    deltas
        .iter()
        .filter_map(|&(files, ranks)| sq.offset(files, ranks))
        .collect()
}

#[inline]
fn leapers() -> &'static LeaperTables {
    LEAPERS.get_or_init(LeaperTables::build)
}

/// Forces table construction, so the first search does not pay for it.
pub fn init_attack_tables() {
    leapers();
}

/// Squares a knight on `sq` attacks.
#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    leapers().knight[sq.index() as usize]
}

/// Squares a king on `sq` attacks.
#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    leapers().king[sq.index() as usize]
}

/// Squares a `color` pawn on `sq` captures on.
#[inline]
pub fn pawn_attacks(sq: Square, color: Color) -> Bitboard {
    leapers().pawn[color.index()][sq.index() as usize]
}
