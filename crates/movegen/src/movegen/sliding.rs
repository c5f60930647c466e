//! Table-free sliding attacks ("hyperbola quintessence").
//!
//! For a piece bit `p` and a line mask `m` (not containing `p`), the attacks
//! along the line are
//!
//! ```text
//! ((o & m) - 2p) ^ rev(rev(o & m) - 2 rev(p))   masked by m
//! ```
//!
//! The subtraction borrows through empty squares up to the first blocker, in
//! one direction for the plain term and in the other for the reversed term.
//! Byte swapping reverses the order of squares along files and diagonals;
//! ranks live inside a single byte and need a full bit reversal instead.
//!
//! The magic tables are filled from these functions.

use super::geometry::{anti_diagonal_line, diagonal_line, file_line, rank_line};
use crate::Bitboard;
use movegen_core::Square;

#[inline]
fn along(
    occupied: Bitboard,
    line: Bitboard,
    piece: Bitboard,
    reverse: fn(Bitboard) -> Bitboard,
) -> Bitboard {
    let o = occupied & line;
    let forward = o.0.wrapping_sub(piece.0 << 1);
    let backward = reverse(Bitboard(reverse(o).0.wrapping_sub(reverse(piece).0 << 1)));
    Bitboard(forward ^ backward.0) & line
}

/// Attacks along the line through `sq` given by `line`, which must be a
/// file or a diagonal.
#[inline]
pub fn line_attacks(sq: Square, occupied: Bitboard, line: Bitboard) -> Bitboard {
    along(occupied, line, Bitboard::from_square(sq), Bitboard::swap_bytes)
}

/// Attacks along the rank of `sq`.
#[inline]
pub fn rank_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    along(
        occupied,
        rank_line(sq),
        Bitboard::from_square(sq),
        Bitboard::reverse_bits,
    )
}

/// Rook attacks without any lookup table.
pub fn rook_attacks_slow(sq: Square, occupied: Bitboard) -> Bitboard {
    rank_attacks(sq, occupied) | line_attacks(sq, occupied, file_line(sq))
}

/// Bishop attacks without any lookup table.
pub fn bishop_attacks_slow(sq: Square, occupied: Bitboard) -> Bitboard {
    line_attacks(sq, occupied, diagonal_line(sq))
        | line_attacks(sq, occupied, anti_diagonal_line(sq))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Ray walking, one square at a time.
    fn walk(sq: Square, occupied: Bitboard, dirs: &[(i8, i8)]) -> Bitboard {
        let mut attacks = Bitboard::EMPTY;
        for &(df, dr) in dirs {
            let mut f = sq.file_index() as i8 + df;
            let mut r = sq.rank_index() as i8 + dr;
            while let Some(to) = Square::from_coords(f, r) {
                attacks.set(to);
                if occupied.contains(to) {
                    break;
                }
                f += df;
                r += dr;
            }
        }
        attacks
    }

    const ROOK_DIRS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
    const BISHOP_DIRS: [(i8, i8); 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];

    #[test]
    fn empty_board() {
        assert_eq!(rook_attacks_slow(Square::A1, Bitboard::EMPTY).count(), 14);
        assert_eq!(bishop_attacks_slow(Square::D4, Bitboard::EMPTY).count(), 13);
        assert_eq!(bishop_attacks_slow(Square::H8, Bitboard::EMPTY).count(), 7);
    }

    #[test]
    fn rank_attacks_stop_at_blockers() {
        let occupied: Bitboard = [Square::B4, Square::G4, Square::E7].into_iter().collect();
        let attacks = rank_attacks(Square::E4, occupied);
        let expected: Bitboard = [Square::B4, Square::C4, Square::D4, Square::F4, Square::G4]
            .into_iter()
            .collect();
        assert_eq!(attacks, expected);
    }

    #[test]
    fn corner_squares() {
        // Wrapping arithmetic at bit 63 and after reversal to bit 63.
        for sq in [Square::A1, Square::H1, Square::A8, Square::H8] {
            let occupied = Bitboard(0x0042_0000_0000_4200);
            assert_eq!(rook_attacks_slow(sq, occupied), walk(sq, occupied, &ROOK_DIRS));
            assert_eq!(bishop_attacks_slow(sq, occupied), walk(sq, occupied, &BISHOP_DIRS));
        }
    }

    #[test]
    fn matches_ray_walk_on_sample_boards() {
        let boards = [
            Bitboard::EMPTY,
            Bitboard::FULL,
            Bitboard(0xFFFF_0000_0000_FFFF),
            Bitboard(0x0000_1008_2400_8100),
            Bitboard(0x8142_2418_1824_4281),
        ];
        for occupied in boards {
            for sq in Square::all() {
                assert_eq!(
                    rook_attacks_slow(sq, occupied),
                    walk(sq, occupied, &ROOK_DIRS),
                    "rook {}",
                    sq
                );
                assert_eq!(
                    bishop_attacks_slow(sq, occupied),
                    walk(sq, occupied, &BISHOP_DIRS),
                    "bishop {}",
                    sq
                );
            }
        }
    }
}
