//! Castling rights and the fixed squares each castle involves.

use crate::Bitboard;
use chess_core::{Color, Square};

/// The four castling permission flags.
///
/// Bit layout matches the usual 4-bit encoding: white king-side = 1,
/// white queen-side = 2, black king-side = 4, black queen-side = 8.
/// Play only ever clears flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const ALL: CastlingRights = CastlingRights(0b1111);
    pub const WHITE_KINGSIDE: u8 = 0b0001;
    pub const WHITE_QUEENSIDE: u8 = 0b0010;
    pub const BLACK_KINGSIDE: u8 = 0b0100;
    pub const BLACK_QUEENSIDE: u8 = 0b1000;

    /// Builds rights from raw flags; bits above the low four are dropped.
    #[inline]
    pub const fn new(flags: u8) -> Self {
        CastlingRights(flags & 0b1111)
    }

    /// Builds rights from FEN letters (`KQkq` subset); other characters are
    /// ignored.
    pub fn from_fen(letters: &str) -> Self {
        let flags = letters.chars().fold(0, |acc, c| {
            acc | match c {
                'K' => Self::WHITE_KINGSIDE,
                'Q' => Self::WHITE_QUEENSIDE,
                'k' => Self::BLACK_KINGSIDE,
                'q' => Self::BLACK_QUEENSIDE,
                _ => 0,
            }
        });
        CastlingRights(flags)
    }

    /// FEN castling field, `-` when empty.
    pub fn to_fen(self) -> String {
        let letters: String = [
            (Self::WHITE_KINGSIDE, 'K'),
            (Self::WHITE_QUEENSIDE, 'Q'),
            (Self::BLACK_KINGSIDE, 'k'),
            (Self::BLACK_QUEENSIDE, 'q'),
        ]
        .iter()
        .filter(|(flag, _)| self.0 & flag != 0)
        .map(|&(_, c)| c)
        .collect();
        if letters.is_empty() {
            "-".to_string()
        } else {
            letters
        }
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn allows(self, color: Color, side: CastleSide) -> bool {
        self.0 & side.flag(color) != 0
    }

    /// Drops one wing's right for `color`.
    #[inline]
    pub fn revoke(&mut self, color: Color, side: CastleSide) {
        self.0 &= !side.flag(color);
    }

    /// Drops both of `color`'s rights.
    #[inline]
    pub fn revoke_all(&mut self, color: Color) {
        self.revoke(color, CastleSide::King);
        self.revoke(color, CastleSide::Queen);
    }
}

/// Which wing a castle goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    King,
    Queen,
}

impl CastleSide {
    pub const BOTH: [CastleSide; 2] = [CastleSide::King, CastleSide::Queen];

    const fn flag(self, color: Color) -> u8 {
        match (color, self) {
            (Color::White, CastleSide::King) => CastlingRights::WHITE_KINGSIDE,
            (Color::White, CastleSide::Queen) => CastlingRights::WHITE_QUEENSIDE,
            (Color::Black, CastleSide::King) => CastlingRights::BLACK_KINGSIDE,
            (Color::Black, CastleSide::Queen) => CastlingRights::BLACK_QUEENSIDE,
        }
    }
}

/// Squares touched by one castle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastlePath {
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
    /// Squares between king and rook; all must be empty.
    pub between: Bitboard,
    /// King origin, transit and destination; none may be attacked.
    pub king_walk: [Square; 3],
}

impl CastlePath {
    pub const fn of(color: Color, side: CastleSide) -> CastlePath {
        match (color, side) {
            (Color::White, CastleSide::King) => CastlePath {
                king_from: Square::E1,
                king_to: Square::G1,
                rook_from: Square::H1,
                rook_to: Square::F1,
                between: Bitboard::new(Square::F1.bit() | Square::G1.bit()),
                king_walk: [Square::E1, Square::F1, Square::G1],
            },
            (Color::White, CastleSide::Queen) => CastlePath {
                king_from: Square::E1,
                king_to: Square::C1,
                rook_from: Square::A1,
                rook_to: Square::D1,
                between: Bitboard::new(Square::B1.bit() | Square::C1.bit() | Square::D1.bit()),
                king_walk: [Square::E1, Square::D1, Square::C1],
            },
            (Color::Black, CastleSide::King) => CastlePath {
                king_from: Square::E8,
                king_to: Square::G8,
                rook_from: Square::H8,
                rook_to: Square::F8,
                between: Bitboard::new(Square::F8.bit() | Square::G8.bit()),
                king_walk: [Square::E8, Square::F8, Square::G8],
            },
            (Color::Black, CastleSide::Queen) => CastlePath {
                king_from: Square::E8,
                king_to: Square::C8,
                rook_from: Square::A8,
                rook_to: Square::D8,
                between: Bitboard::new(Square::B8.bit() | Square::C8.bit() | Square::D8.bit()),
                king_walk: [Square::E8, Square::D8, Square::C8],
            },
        }
    }

    /// The castle whose king move is exactly `from` -> `to`, if any.
    pub fn matching(color: Color, from: Square, to: Square) -> Option<CastlePath> {
        CastleSide::BOTH
            .iter()
            .map(|&side| CastlePath::of(color, side))
            .find(|path| path.king_from == from && path.king_to == to)
    }

    /// The wing whose rook starts on `sq` for `color`, if any.
    pub fn rook_home(color: Color, sq: Square) -> Option<CastleSide> {
        CastleSide::BOTH
            .into_iter()
            .find(|&side| CastlePath::of(color, side).rook_from == sq)
    }
}
