//! Static board geometry: lines through squares, relevant occupancy masks,
//! connecting rays and castling paths.
//!
//! Everything here is derived from square coordinates. The per-square
//! tables are compile-time constants; the 64x64 pair tables are built once
//! on first use and shared read-only afterwards.

use crate::Bitboard;
use movegen_core::{Color, MoveFlag, Square};
use std::sync::OnceLock;

/// Squares on the same rank, excluding the square itself.
const RANK_LINES: [Bitboard; 64] = compute_lines(1, 0);
/// Squares on the same file, excluding the square itself.
const FILE_LINES: [Bitboard; 64] = compute_lines(0, 1);
/// Squares on the a1-h8 direction diagonal, excluding the square itself.
const DIAGONAL_LINES: [Bitboard; 64] = compute_lines(1, 1);
/// Squares on the h1-a8 direction diagonal, excluding the square itself.
const ANTI_DIAGONAL_LINES: [Bitboard; 64] = compute_lines(-1, 1);

#[inline]
pub fn rank_line(sq: Square) -> Bitboard {
    RANK_LINES[sq.index() as usize]
}

#[inline]
pub fn file_line(sq: Square) -> Bitboard {
    FILE_LINES[sq.index() as usize]
}

#[inline]
pub fn diagonal_line(sq: Square) -> Bitboard {
    DIAGONAL_LINES[sq.index() as usize]
}

#[inline]
pub fn anti_diagonal_line(sq: Square) -> Bitboard {
    ANTI_DIAGONAL_LINES[sq.index() as usize]
}

/// Squares whose occupancy can change a rook's attacks from `sq`.
///
/// The last square of each ray is dropped: a blocker there stops nothing.
#[inline]
pub fn rook_relevant_mask(sq: Square) -> Bitboard {
    (rank_line(sq) & !(Bitboard::FILE_A | Bitboard::FILE_H))
        | (file_line(sq) & !(Bitboard::RANK_1 | Bitboard::RANK_8))
}

/// Squares whose occupancy can change a bishop's attacks from `sq`.
#[inline]
pub fn bishop_relevant_mask(sq: Square) -> Bitboard {
    (diagonal_line(sq) | anti_diagonal_line(sq)) & !Bitboard::EDGES
}

/// Walks from every square in both directions of (df, dr).
const fn compute_lines(df: i8, dr: i8) -> [Bitboard; 64] {
    let mut lines = [Bitboard::EMPTY; 64];
    let mut sq = 0u8;

    while sq < 64 {
        let mut bb = 0u64;
        let mut sign = -1i8;
        while sign <= 1 {
            let mut f = (sq % 8) as i8 + sign * df;
            let mut r = (sq / 8) as i8 + sign * dr;
            while f >= 0 && f < 8 && r >= 0 && r < 8 {
                bb |= 1u64 << ((r * 8 + f) as u32);
                f += sign * df;
                r += sign * dr;
            }
            sign += 2;
        }
        lines[sq as usize] = Bitboard(bb);
        sq += 1;
    }

    lines
}

struct PairTables {
    between: Vec<Bitboard>,
    line: Vec<Bitboard>,
}

static PAIR_TABLES: OnceLock<PairTables> = OnceLock::new();

fn pair_tables() -> &'static PairTables {
    PAIR_TABLES.get_or_init(PairTables::new)
}

impl PairTables {
    fn new() -> Self {
        let mut between = vec![Bitboard::EMPTY; 64 * 64];
        let mut line = vec![Bitboard::EMPTY; 64 * 64];

        for a in Square::all() {
            for b in Square::all() {
                let Some(full) = shared_line(a, b) else {
                    continue;
                };
                let (lo, hi) = if a < b { (a, b) } else { (b, a) };
                // Bits strictly above `lo` and strictly below `hi`.
                let span = (1u64 << hi.index()).wrapping_sub(2u64 << lo.index());
                let idx = pair_index(a, b);
                line[idx] = full;
                between[idx] = full & Bitboard(span);
            }
        }

        PairTables { between, line }
    }
}

/// The full line through two distinct co-linear squares, endpoints included.
fn shared_line(a: Square, b: Square) -> Option<Bitboard> {
    if a == b {
        return None;
    }
    [rank_line, file_line, diagonal_line, anti_diagonal_line]
        .into_iter()
        .map(|line_of| line_of(a))
        .find(|line| line.contains(b))
        .map(|line| line | Bitboard::from_square(a))
}

#[inline]
fn pair_index(a: Square, b: Square) -> usize {
    a.index() as usize * 64 + b.index() as usize
}

/// Squares strictly between `a` and `b`, or empty if they share no line.
#[inline]
pub fn between(a: Square, b: Square) -> Bitboard {
    pair_tables().between[pair_index(a, b)]
}

/// The whole rank, file or diagonal through `a` and `b` (both included),
/// or empty if they share no line.
#[inline]
pub fn line(a: Square, b: Square) -> Bitboard {
    pair_tables().line[pair_index(a, b)]
}

/// Which rook a king castles with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    /// Toward the h-file (O-O).
    Short,
    /// Toward the a-file (O-O-O).
    Long,
}

impl CastleSide {
    pub const ALL: [CastleSide; 2] = [CastleSide::Short, CastleSide::Long];

    /// The move flag of a castling move on this side.
    #[inline]
    pub const fn flag(self) -> MoveFlag {
        match self {
            CastleSide::Short => MoveFlag::CastleShort,
            CastleSide::Long => MoveFlag::CastleLong,
        }
    }

    /// Inverse of [`CastleSide::flag`].
    #[inline]
    pub const fn from_flag(flag: MoveFlag) -> Option<Self> {
        match flag {
            MoveFlag::CastleShort => Some(CastleSide::Short),
            MoveFlag::CastleLong => Some(CastleSide::Long),
            _ => None,
        }
    }
}

/// Squares involved in one castling move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastlingPath {
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
    /// Squares between king and rook that must hold no piece.
    pub must_be_empty: Bitboard,
    /// Squares the king crosses or lands on; none may be attacked.
    ///
    /// On the long side this leaves out the knight's home square: a piece
    /// there blocks, an attack there does not.
    pub must_be_safe: Bitboard,
}

impl CastlingPath {
    /// Bits the king and rook leave and enter.
    #[inline]
    pub fn king_move(&self) -> Bitboard {
        Bitboard::from_square(self.king_from) | Bitboard::from_square(self.king_to)
    }

    #[inline]
    pub fn rook_move(&self) -> Bitboard {
        Bitboard::from_square(self.rook_from) | Bitboard::from_square(self.rook_to)
    }
}

const fn on_rank(file: u8, rank: u8) -> Square {
    Square::from_bit(rank * 8 + file)
}

const fn bits(files: &[u8], rank: u8) -> Bitboard {
    let mut bb = 0u64;
    let mut i = 0;
    while i < files.len() {
        bb |= 1u64 << (rank * 8 + files[i]);
        i += 1;
    }
    Bitboard(bb)
}

const fn compute_path(color: Color, side: CastleSide) -> CastlingPath {
    let rank = color.back_rank();
    match side {
        CastleSide::Short => CastlingPath {
            king_from: on_rank(4, rank),
            king_to: on_rank(6, rank),
            rook_from: on_rank(7, rank),
            rook_to: on_rank(5, rank),
            must_be_empty: bits(&[5, 6], rank),
            must_be_safe: bits(&[5, 6], rank),
        },
        CastleSide::Long => CastlingPath {
            king_from: on_rank(4, rank),
            king_to: on_rank(2, rank),
            rook_from: on_rank(0, rank),
            rook_to: on_rank(3, rank),
            must_be_empty: bits(&[1, 2, 3], rank),
            must_be_safe: bits(&[2, 3], rank),
        },
    }
}

const CASTLING_PATHS: [[CastlingPath; 2]; 2] = [
    [
        compute_path(Color::White, CastleSide::Short),
        compute_path(Color::White, CastleSide::Long),
    ],
    [
        compute_path(Color::Black, CastleSide::Short),
        compute_path(Color::Black, CastleSide::Long),
    ],
];

/// Home squares of both kings and all four rooks.
pub const CASTLING_HOMES: Bitboard = Bitboard(
    bits(&[0, 4, 7], 0).0 | bits(&[0, 4, 7], 7).0,
);

/// The fixed squares of a castling move.
#[inline]
pub const fn castling_path(color: Color, side: CastleSide) -> &'static CastlingPath {
    &CASTLING_PATHS[color.index()][side as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn squares(list: &[Square]) -> Bitboard {
        list.iter().copied().collect()
    }

    #[test]
    fn lines_exclude_origin() {
        for sq in Square::all() {
            assert_eq!(rank_line(sq).count(), 7);
            assert_eq!(file_line(sq).count(), 7);
            assert!(!diagonal_line(sq).contains(sq));
            assert!(!anti_diagonal_line(sq).contains(sq));
        }
        assert_eq!(diagonal_line(Square::A1).count(), 7);
        assert_eq!(anti_diagonal_line(Square::A1).count(), 0);
        assert_eq!(
            anti_diagonal_line(Square::E4),
            squares(&[Square::H1, Square::G2, Square::F3, Square::D5, Square::C6, Square::B7, Square::A8])
        );
    }

    #[test]
    fn relevant_mask_sizes() {
        assert_eq!(rook_relevant_mask(Square::A1).count(), 12);
        assert_eq!(rook_relevant_mask(Square::E4).count(), 10);
        assert_eq!(rook_relevant_mask(Square::B1).count(), 11);
        assert_eq!(bishop_relevant_mask(Square::A1).count(), 6);
        assert_eq!(bishop_relevant_mask(Square::D4).count(), 9);
        assert!(!rook_relevant_mask(Square::A1).contains(Square::H1));
        assert!(!rook_relevant_mask(Square::A1).contains(Square::A8));
    }

    #[test]
    fn between_squares() {
        assert_eq!(
            between(Square::A1, Square::D4),
            squares(&[Square::B2, Square::C3])
        );
        assert_eq!(between(Square::D4, Square::A1), between(Square::A1, Square::D4));
        assert_eq!(
            between(Square::E1, Square::E8).count(),
            6
        );
        assert_eq!(
            between(Square::H1, Square::A1),
            squares(&[Square::B1, Square::C1, Square::D1, Square::E1, Square::F1, Square::G1])
        );
        assert!(between(Square::E4, Square::E5).is_empty());
        assert!(between(Square::A1, Square::B3).is_empty());
        assert!(between(Square::C3, Square::C3).is_empty());
    }

    #[test]
    fn line_through_squares() {
        let l = line(Square::C3, Square::E5);
        assert_eq!(l, diagonal_line(Square::A1) | Bitboard::from_square(Square::A1));
        assert!(l.contains(Square::C3));
        assert!(l.contains(Square::H8));
        assert_eq!(line(Square::B1, Square::B7), Bitboard(0x0202_0202_0202_0202));
        assert!(line(Square::A1, Square::B3).is_empty());
    }

    #[test]
    fn castling_paths() {
        let short = castling_path(Color::White, CastleSide::Short);
        assert_eq!(short.king_from, Square::E1);
        assert_eq!(short.king_to, Square::G1);
        assert_eq!(short.rook_from, Square::H1);
        assert_eq!(short.rook_to, Square::F1);
        assert_eq!(short.must_be_empty, squares(&[Square::F1, Square::G1]));

        let long = castling_path(Color::Black, CastleSide::Long);
        assert_eq!(long.king_to, Square::C8);
        assert_eq!(long.rook_from, Square::A8);
        assert_eq!(long.rook_to, Square::D8);
        assert_eq!(
            long.must_be_empty,
            squares(&[Square::B8, Square::C8, Square::D8])
        );
        assert_eq!(long.must_be_safe, squares(&[Square::C8, Square::D8]));
        assert_eq!(long.king_move(), squares(&[Square::E8, Square::C8]));
    }

    #[test]
    fn castling_homes() {
        assert_eq!(
            CASTLING_HOMES,
            squares(&[Square::A1, Square::E1, Square::H1, Square::A8, Square::E8, Square::H8])
        );
    }

    #[test]
    fn castle_side_flags() {
        for side in CastleSide::ALL {
            assert_eq!(CastleSide::from_flag(side.flag()), Some(side));
        }
        assert_eq!(CastleSide::from_flag(MoveFlag::Quiet), None);
    }
}
