//! Leaper attack tables and per-piece attack dispatch.

use crate::Bitboard;
use movegen_core::{Color, Piece, PieceKind, Square};

pub use super::magics::{bishop_attacks, queen_attacks, rook_attacks};

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

/// Precomputed knight attack tables.
const KNIGHT_ATTACKS: [Bitboard; 64] = compute_leaper(&KNIGHT_DELTAS);

/// Precomputed king attack tables.
const KING_ATTACKS: [Bitboard; 64] = compute_leaper(&KING_DELTAS);

/// Precomputed pawn capture tables [color][square].
const PAWN_ATTACKS: [[Bitboard; 64]; 2] = [
    compute_leaper(&[(1, 1), (-1, 1)]),
    compute_leaper(&[(1, -1), (-1, -1)]),
];

/// Returns knight attacks from the given square.
#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq.index() as usize]
}

/// Returns king attacks from the given square.
#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq.index() as usize]
}

/// Returns the squares a pawn of `color` standing on `sq` captures on.
///
/// Read backwards this also answers "which enemy pawns attack `sq`":
/// `pawn_attacks(sq, us) & their_pawns`.
#[inline]
pub fn pawn_attacks(sq: Square, color: Color) -> Bitboard {
    PAWN_ATTACKS[color.index()][sq.index() as usize]
}

/// Capture squares of a whole set of pawns at once.
#[inline]
pub fn pawn_attacks_all(pawns: Bitboard, color: Color) -> Bitboard {
    match color {
        Color::White => pawns.north_east() | pawns.north_west(),
        Color::Black => pawns.south_east() | pawns.south_west(),
    }
}

/// Squares attacked by `piece` standing on `sq` given the board occupancy.
///
/// Leapers ignore `occupied`; sliders stop at (and include) the first
/// occupied square along each ray.
#[inline]
pub fn attacks(piece: Piece, sq: Square, occupied: Bitboard) -> Bitboard {
    match piece.kind() {
        PieceKind::Pawn => pawn_attacks(sq, piece.color()),
        PieceKind::Knight => knight_attacks(sq),
        PieceKind::Bishop => bishop_attacks(sq, occupied),
        PieceKind::Rook => rook_attacks(sq, occupied),
        PieceKind::Queen => queen_attacks(sq, occupied),
        PieceKind::King => king_attacks(sq),
    }
}

/// Builds a leaper table from (file, rank) deltas at compile time.
const fn compute_leaper(deltas: &[(i8, i8)]) -> [Bitboard; 64] {
    let mut attacks = [Bitboard::EMPTY; 64];
    let mut sq = 0u8;

    while sq < 64 {
        let file = (sq % 8) as i8;
        let rank = (sq / 8) as i8;
        let mut bb = 0u64;
        let mut i = 0;
        while i < deltas.len() {
            let (df, dr) = deltas[i];
            let f = file + df;
            let r = rank + dr;
            if f >= 0 && f < 8 && r >= 0 && r < 8 {
                bb |= 1u64 << ((r * 8 + f) as u32);
            }
            i += 1;
        }
        attacks[sq as usize] = Bitboard(bb);
        sq += 1;
    }

    attacks
}
