//! Legal move generation.
//!
//! Moves come out legal by construction: the king avoids every square the
//! enemy attacks, checks restrict the other pieces to capture and block
//! masks, and pinned pieces stay on the line through their king. Nothing is
//! made and taken back to test legality.

mod attacks;
mod geometry;
mod magics;
mod make;
pub mod perft;
mod sliding;

use crate::{Bitboard, Position};
use movegen_core::{Color, Move, MoveFlag, PieceKind, Square};

pub use attacks::{
    attacks, bishop_attacks, king_attacks, knight_attacks, pawn_attacks, pawn_attacks_all,
    queen_attacks, rook_attacks,
};
pub use geometry::{
    anti_diagonal_line, between, bishop_relevant_mask, castling_path, diagonal_line, file_line,
    line, rank_line, rook_relevant_mask, CastleSide, CastlingPath, CASTLING_HOMES,
};
pub use magics::{find_magic, init, magic_entry, subsets, Magic, Slider};
pub use sliding::{bishop_attacks_slow, line_attacks, rank_attacks, rook_attacks_slow};

/// A list of moves with a fixed maximum capacity.
///
/// Chess positions have at most 218 legal moves, so we use a fixed-size
/// array to avoid heap allocations during move generation.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    /// Capacity of the list; above the 218 of the richest known position.
    pub const MAX_MOVES: usize = 256;

    /// Creates an empty move list.
    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [Move::NULL; Self::MAX_MOVES],
            len: 0,
        }
    }

    /// Adds a move to the list.
    #[inline]
    pub fn push(&mut self, m: Move) {
        debug_assert!(self.len < Self::MAX_MOVES);
        self.moves[self.len] = m;
        self.len += 1;
    }

    /// Returns the number of moves.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a slice of the moves.
    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    /// Returns true if the exact move (flag included) is in the list.
    #[inline]
    pub fn contains(&self, m: Move) -> bool {
        self.as_slice().contains(&m)
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
    fn index(&self, index: usize) -> &Self::Output {
        debug_assert!(index < self.len);
        &self.moves[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Generates all legal moves for the side to move.
pub fn generate_moves(position: &Position) -> MoveList {
    generate_moves_for(position, position.side_to_move())
}

/// Generates all legal moves for `us`, whether or not it is their turn.
///
/// En passant is only available to the side to move.
pub fn generate_moves_for(position: &Position, us: Color) -> MoveList {
    Generator::new(position, us).run()
}

/// Every piece of `by` that attacks `sq`, with sliders blocked by `occupied`.
pub fn attackers_to(position: &Position, sq: Square, by: Color, occupied: Bitboard) -> Bitboard {
    let diagonal = position.pieces(by, PieceKind::Bishop) | position.pieces(by, PieceKind::Queen);
    let orthogonal = position.pieces(by, PieceKind::Rook) | position.pieces(by, PieceKind::Queen);

    (pawn_attacks(sq, !by) & position.pieces(by, PieceKind::Pawn))
        | (knight_attacks(sq) & position.pieces(by, PieceKind::Knight))
        | (king_attacks(sq) & position.pieces(by, PieceKind::King))
        | (bishop_attacks(sq, occupied) & diagonal)
        | (rook_attacks(sq, occupied) & orthogonal)
}

/// Returns true if the given square is attacked by the given color.
pub fn is_square_attacked(position: &Position, sq: Square, by: Color) -> bool {
    attackers_to(position, sq, by, position.occupied()).is_not_empty()
}

/// Union of the squares `by` attacks, with sliders blocked by `occupied`.
pub fn attacked_squares(position: &Position, by: Color, occupied: Bitboard) -> Bitboard {
    let mut attacked = pawn_attacks_all(position.pieces(by, PieceKind::Pawn), by);
    for sq in position.pieces(by, PieceKind::Knight) {
        attacked |= knight_attacks(sq);
    }
    for sq in position.pieces(by, PieceKind::King) {
        attacked |= king_attacks(sq);
    }
    for sq in position.pieces(by, PieceKind::Bishop) | position.pieces(by, PieceKind::Queen) {
        attacked |= bishop_attacks(sq, occupied);
    }
    for sq in position.pieces(by, PieceKind::Rook) | position.pieces(by, PieceKind::Queen) {
        attacked |= rook_attacks(sq, occupied);
    }
    attacked
}

/// Returns true if the king of `color` is attacked.
pub fn in_check(position: &Position, color: Color) -> bool {
    position
        .pieces(color, PieceKind::King)
        .into_iter()
        .any(|king| is_square_attacked(position, king, !color))
}

/// Enemy pieces giving check to the side to move.
pub fn checkers(position: &Position) -> Bitboard {
    let us = position.side_to_move();
    position
        .pieces(us, PieceKind::King)
        .into_iter()
        .fold(Bitboard::EMPTY, |acc, king| {
            acc | attackers_to(position, king, !us, position.occupied())
        })
}

/// Working state of one generator call.
struct Generator<'a> {
    position: &'a Position,
    us: Color,
    them: Color,
    king: Square,
    friendly: Bitboard,
    enemy: Bitboard,
    all: Bitboard,
    moves: MoveList,
}

impl<'a> Generator<'a> {
    fn new(position: &'a Position, us: Color) -> Self {
        let friendly = position.color_occupancy(us);
        let enemy = position.color_occupancy(!us);
        Generator {
            position,
            us,
            them: !us,
            king: position.king_square(us),
            friendly,
            enemy,
            all: friendly | enemy,
            moves: MoveList::new(),
        }
    }

    fn run(mut self) -> MoveList {
        // The king must not shield the squares behind it from a slider.
        let danger = attacked_squares(
            self.position,
            self.them,
            self.all ^ Bitboard::from_square(self.king),
        );
        self.push_targets(self.king, king_attacks(self.king) & !(danger | self.friendly));

        let (checkers, pinned) = self.checkers_and_pins();
        let (quiet, capture) = match checkers.count() {
            0 => {
                let (quiet, capture) = (!self.all, self.enemy);
                self.castling(danger);
                self.pinned(pinned, quiet, capture);
                (quiet, capture)
            }
            1 => {
                let checker = checkers.lsb();
                let sliding = self
                    .position
                    .piece_at(checker)
                    .is_some_and(|piece| piece.kind().is_slider());
                let block = if sliding {
                    between(self.king, checker)
                } else {
                    Bitboard::EMPTY
                };
                (block, checkers)
            }
            // Double check: only the king moves pushed above can answer it.
            _ => return self.moves,
        };

        let free = self.friendly & !pinned;
        self.pawns(self.position.pieces(self.us, PieceKind::Pawn) & free, quiet, capture);
        self.en_passant(quiet, capture);

        let targets = quiet | capture;
        for from in self.position.pieces(self.us, PieceKind::Knight) & free {
            self.push_targets(from, knight_attacks(from) & targets);
        }
        for from in self.diagonal(self.us) & free {
            self.push_targets(from, bishop_attacks(from, self.all) & targets);
        }
        for from in self.orthogonal(self.us) & free {
            self.push_targets(from, rook_attacks(from, self.all) & targets);
        }

        self.moves
    }

    fn diagonal(&self, color: Color) -> Bitboard {
        self.position.pieces(color, PieceKind::Bishop) | self.position.pieces(color, PieceKind::Queen)
    }

    fn orthogonal(&self, color: Color) -> Bitboard {
        self.position.pieces(color, PieceKind::Rook) | self.position.pieces(color, PieceKind::Queen)
    }

    /// Pieces checking our king, and our pieces pinned to it.
    fn checkers_and_pins(&self) -> (Bitboard, Bitboard) {
        let mut checkers = (knight_attacks(self.king)
            & self.position.pieces(self.them, PieceKind::Knight))
            | (pawn_attacks(self.king, self.us) & self.position.pieces(self.them, PieceKind::Pawn));

        // Looking through our own pieces finds every enemy slider on a
        // line with the king that nothing of theirs screens.
        let snipers = (bishop_attacks(self.king, self.enemy) & self.diagonal(self.them))
            | (rook_attacks(self.king, self.enemy) & self.orthogonal(self.them));

        let mut pinned = Bitboard::EMPTY;
        for sniper in snipers {
            let blockers = between(self.king, sniper) & self.friendly;
            if blockers.is_empty() {
                checkers |= Bitboard::from_square(sniper);
            } else if !blockers.has_many() {
                pinned |= blockers;
            }
        }
        (checkers, pinned)
    }

    fn castling(&mut self, danger: Bitboard) {
        for side in CastleSide::ALL {
            let path = castling_path(self.us, side);
            if self.position.can_castle(self.us, side)
                && (self.all & path.must_be_empty).is_empty()
                && (danger & path.must_be_safe).is_empty()
            {
                self.moves.push(Move::new(path.king_from, path.king_to, side.flag()));
            }
        }
    }

    /// Moves of pinned pieces, kept on the line through the king.
    fn pinned(&mut self, pinned: Bitboard, quiet: Bitboard, capture: Bitboard) {
        for from in pinned {
            let Some(piece) = self.position.piece_at(from) else {
                continue;
            };
            let ray = line(self.king, from);
            match piece.kind() {
                PieceKind::Pawn => {
                    self.pawns(Bitboard::from_square(from), quiet & ray, capture & ray)
                }
                PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
                    let targets = attacks(piece, from, self.all) & ray & (quiet | capture);
                    self.push_targets(from, targets);
                }
                PieceKind::Knight | PieceKind::King => {}
            }
        }
    }

    /// Pushes, double pushes and captures, promotions included.
    fn pawns(&mut self, pawns: Bitboard, quiet: Bitboard, capture: Bitboard) {
        let step = self.us.pawn_push();
        let (double_rank, last_rank) = match self.us {
            Color::White => (Bitboard::RANK_3, Bitboard::RANK_8),
            Color::Black => (Bitboard::RANK_6, Bitboard::RANK_1),
        };

        let pushed = pawns.forward(self.us) & !self.all;
        let doubles = (pushed & double_rank).forward(self.us) & !self.all & quiet;

        for to in pushed & quiet {
            let from = to.offset(-step);
            if last_rank.contains(to) {
                for flag in MoveFlag::PROMOTIONS {
                    self.moves.push(Move::new(from, to, flag));
                }
            } else {
                self.moves.push(Move::quiet(from, to));
            }
        }

        for to in doubles {
            self.moves
                .push(Move::new(to.offset(-2 * step), to, MoveFlag::DoublePush));
        }

        for from in pawns {
            for to in pawn_attacks(from, self.us) & capture {
                if last_rank.contains(to) {
                    for flag in MoveFlag::PROMOTION_CAPTURES {
                        self.moves.push(Move::new(from, to, flag));
                    }
                } else {
                    self.moves.push(Move::capture(from, to));
                }
            }
        }
    }

    /// En passant for every pawn, pinned or not.
    ///
    /// Two pawns leave the board line at once, which pin detection cannot
    /// see, so each candidate is checked against the enemy sliders with
    /// both pawns gone and the capturing pawn on the target.
    fn en_passant(&mut self, quiet: Bitboard, capture: Bitboard) {
        if self.us != self.position.side_to_move() {
            return;
        }
        let Some(target) = self.position.en_passant() else {
            return;
        };
        let victim = target.offset(self.them.pawn_push());
        if !quiet.contains(target) && !capture.contains(victim) {
            return;
        }

        let candidates =
            pawn_attacks(target, self.them) & self.position.pieces(self.us, PieceKind::Pawn);
        for from in candidates {
            let occupied = (self.all
                ^ Bitboard::from_square(from)
                ^ Bitboard::from_square(victim))
                | Bitboard::from_square(target);
            let exposed = (rook_attacks(self.king, occupied) & self.orthogonal(self.them))
                | (bishop_attacks(self.king, occupied) & self.diagonal(self.them));
            if exposed.is_empty() {
                self.moves.push(Move::new(from, target, MoveFlag::EnPassant));
            }
        }
    }

    fn push_targets(&mut self, from: Square, targets: Bitboard) {
        for to in targets {
            if self.enemy.contains(to) {
                self.moves.push(Move::capture(from, to));
            } else {
                self.moves.push(Move::quiet(from, to));
            }
        }
    }
}
