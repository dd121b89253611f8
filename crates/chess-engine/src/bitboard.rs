//! 64-bit square sets.
//!
//! Bit `i` stands for square index `i` (a1 = 0, h8 = 63). Iterating a
//! bitboard yields its squares in ascending index order, which is the order
//! move generation and search rely on.

use chess_core::{Rank, Square};
use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

/// A set of squares packed into a `u64`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bitboard(pub u64);

impl Bitboard {
    pub const EMPTY: Bitboard = Bitboard(0);
    pub const FULL: Bitboard = Bitboard(!0);

    #[inline]
    pub const fn new(bits: u64) -> Self {
        Bitboard(bits)
    }

    #[inline]
    pub const fn from_square(sq: Square) -> Self {
        Bitboard(sq.bit())
    }

    /// All eight squares of `rank`.
    #[inline]
    pub const fn rank(rank: Rank) -> Self {
        Bitboard(0xFF << (rank.index() * 8))
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_not_empty(self) -> bool {
        self.0 != 0
    }

    /// Number of squares in the set.
    #[inline]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    #[inline]
    pub const fn contains(self, sq: Square) -> bool {
        self.0 & sq.bit() != 0
    }

    #[inline]
    pub fn set(&mut self, sq: Square) {
        self.0 |= sq.bit();
    }

    #[inline]
    pub fn clear(&mut self, sq: Square) {
        self.0 &= !sq.bit();
    }

    /// Lowest square in the set.
    #[inline]
    pub const fn lsb(self) -> Option<Square> {
        if self.0 == 0 {
            None
        } else {
            Square::from_index(self.0.trailing_zeros() as u8)
        }
    }

    /// Removes and returns the lowest square in the set.
    #[inline]
    pub fn pop_lsb(&mut self) -> Option<Square> {
        let sq = self.lsb()?;
        self.0 &= self.0 - 1;
        Some(sq)
    }

    /// Mirrors every square across the horizontal midline.
    ///
    /// Ranks are whole bytes, so this is a byte swap.
    #[inline]
    pub const fn flip_vertical(self) -> Self {
        Bitboard(self.0.swap_bytes())
    }
}

macro_rules! bit_op {
    ($op:ident, $method:ident, $assign:ident, $assign_method:ident, $tok:tt) => {
        impl $op for Bitboard {
            type Output = Self;
            #[inline]
            fn $method(self, rhs: Self) -> Self {
                Bitboard(self.0 $tok rhs.0)
            }
        }

        impl $assign for Bitboard {
            #[inline]
            fn $assign_method(&mut self, rhs: Self) {
                *self = *self $tok rhs;
            }
        }
    };
}

bit_op!(BitAnd, bitand, BitAndAssign, bitand_assign, &);
bit_op!(BitOr, bitor, BitOrAssign, bitor_assign, |);
bit_op!(BitXor, bitxor, BitXorAssign, bitxor_assign, ^);

impl Not for Bitboard {
    type Output = Self;
    #[inline]
    fn not(self) -> Self {
        Bitboard(!self.0)
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Bitboard({:#018x})", self.0)?;
        for rank in (0..8u8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8u8 {
                let mark = if self.0 >> (rank * 8 + file) & 1 == 1 {
                    'X'
                } else {
                    '.'
                };
                write!(f, "{mark} ")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "  a b c d e f g h")
    }
}

/// Iterator over the squares of a bitboard, lowest index first.
pub struct BitboardIter(Bitboard);

impl Iterator for BitboardIter {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Square> {
        self.0.pop_lsb()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for BitboardIter {}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = BitboardIter;

    #[inline]
    fn into_iter(self) -> BitboardIter {
        BitboardIter(self)
    }
}

impl FromIterator<Square> for Bitboard {
    fn from_iter<I: IntoIterator<Item = Square>>(iter: I) -> Self {
        let mut bb = Bitboard::EMPTY;
        for sq in iter {
            bb.set(sq);
        }
        bb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::File;

    #[test]
    fn set_clear_contains() {
        let mut bb = Bitboard::EMPTY;
        bb.set(Square::E1);
        assert!(bb.contains(Square::E1));
        assert_eq!(bb.count(), 1);
        bb.clear(Square::E1);
        assert!(bb.is_empty());
    }

    #[test]
    fn rank_masks() {
        assert_eq!(Bitboard::rank(Rank::R1).0, 0xFF);
        assert_eq!(Bitboard::rank(Rank::R8).0, 0xFF00_0000_0000_0000);
        assert_eq!(Bitboard::rank(Rank::R4).count(), 8);
    }

    #[test]
    fn iterates_in_ascending_order() {
        let bb: Bitboard = [Square::H8, Square::A1, Square::E1].into_iter().collect();
        let squares: Vec<Square> = bb.into_iter().collect();
        assert_eq!(squares, vec![Square::A1, Square::E1, Square::H8]);
    }

    #[test]
    fn pop_lsb_drains() {
        let mut bb = Bitboard::new(0b1010);
        assert_eq!(bb.pop_lsb().map(|s| s.index()), Some(1));
        assert_eq!(bb.pop_lsb().map(|s| s.index()), Some(3));
        assert_eq!(bb.pop_lsb(), None);
    }

    #[test]
    fn flip_swaps_back_ranks() {
        let white_back = Bitboard::rank(Rank::R1);
        assert_eq!(white_back.flip_vertical(), Bitboard::rank(Rank::R8));
        let e2 = Square::new(File::E, Rank::R2);
        assert_eq!(
            Bitboard::from_square(e2).flip_vertical(),
            Bitboard::from_square(e2.flip_vertical())
        );
    }
}
