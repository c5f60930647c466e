//! Applying and reverting moves in place.

use super::geometry::{castling_path, CastleSide};
use crate::{Bitboard, Position};
use movegen_core::{Move, MoveFlag, Piece, PieceKind, Square};

impl Position {
    /// Makes a move, pushing a new history entry.
    ///
    /// `mv` must be legal here, normally straight from
    /// [`generate_moves`](crate::generate_moves).
    ///
    /// # Panics
    ///
    /// Panics if there is no piece on the move's source square.
    pub fn make_move(&mut self, mv: Move) {
        let us = self.side_to_move;
        let them = !us;
        let (from, to) = (mv.from(), mv.to());
        let moving = self.occupant(from, mv);

        let mut entry = self.history[self.depth];
        entry.en_passant = None;
        entry.captured = None;
        entry.castling_moved |= Bitboard::from_square(from) | Bitboard::from_square(to);
        entry.halfmove_clock += 1;

        match mv.flag() {
            MoveFlag::DoublePush => {
                self.move_piece(moving, from, to);
                entry.en_passant = Some(from.offset(us.pawn_push()));
            }
            flag @ (MoveFlag::CastleShort | MoveFlag::CastleLong) => {
                let side = match flag {
                    MoveFlag::CastleShort => CastleSide::Short,
                    _ => CastleSide::Long,
                };
                let path = castling_path(us, side);
                self.move_piece(moving, path.king_from, path.king_to);
                self.move_piece(Piece::new(us, PieceKind::Rook), path.rook_from, path.rook_to);
                entry.castling_moved |= Bitboard::from_square(path.rook_from);
            }
            MoveFlag::EnPassant => {
                let victim = Piece::new(them, PieceKind::Pawn);
                self.remove_piece(victim, to.offset(them.pawn_push()));
                self.move_piece(moving, from, to);
                entry.captured = Some(victim);
            }
            flag => {
                if flag.is_capture() {
                    debug_assert!(self.piece_at(to).is_some(), "{:?} captures nothing", mv);
                    if let Some(victim) = self.piece_at(to) {
                        self.remove_piece(victim, to);
                        entry.captured = Some(victim);
                    }
                }
                match flag.promotion_kind() {
                    Some(kind) => {
                        self.remove_piece(moving, from);
                        self.put_piece(Piece::new(us, kind), to);
                    }
                    None => self.move_piece(moving, from, to),
                }
            }
        }

        if moving.kind() == PieceKind::Pawn || entry.captured.is_some() {
            entry.halfmove_clock = 0;
        }

        self.depth += 1;
        if self.depth == self.history.len() {
            self.history.push(entry);
        } else {
            self.history[self.depth] = entry;
        }
        self.side_to_move = them;
    }

    /// Reverts `mv`, which must be the last move made.
    ///
    /// The popped history entry stays in place until a later move at the
    /// same ply overwrites it. Moves must be unmade in the reverse order they
    /// were made; unmaking any other move leaves the position in an
    /// unspecified state.
    pub fn unmake_move(&mut self, mv: Move) {
        debug_assert!(self.depth > 0, "unmake_move with no move made");
        let entry = self.history[self.depth];
        let them = self.side_to_move;
        let us = !them;
        let (from, to) = (mv.from(), mv.to());

        match mv.flag() {
            flag @ (MoveFlag::CastleShort | MoveFlag::CastleLong) => {
                let side = match flag {
                    MoveFlag::CastleShort => CastleSide::Short,
                    _ => CastleSide::Long,
                };
                let path = castling_path(us, side);
                self.move_piece(Piece::new(us, PieceKind::King), path.king_to, path.king_from);
                self.move_piece(Piece::new(us, PieceKind::Rook), path.rook_to, path.rook_from);
            }
            MoveFlag::EnPassant => {
                self.move_piece(Piece::new(us, PieceKind::Pawn), to, from);
                self.put_piece(Piece::new(them, PieceKind::Pawn), to.offset(them.pawn_push()));
            }
            flag => {
                match flag.promotion_kind() {
                    Some(kind) => {
                        self.remove_piece(Piece::new(us, kind), to);
                        self.put_piece(Piece::new(us, PieceKind::Pawn), from);
                    }
                    None => {
                        let moved = self.occupant(to, mv);
                        self.move_piece(moved, to, from);
                    }
                }
                if let Some(victim) = entry.captured {
                    self.put_piece(victim, to);
                }
            }
        }

        self.depth -= 1;
        self.side_to_move = us;
    }

    fn occupant(&self, sq: Square, mv: Move) -> Piece {
        match self.piece_at(sq) {
            Some(piece) => piece,
            None => panic!("{:?} does not fit the position: {} is empty", mv, sq),
        }
    }
}
