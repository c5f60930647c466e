//! Board state: piece bitboards, a square-indexed mailbox kept in sync with
//! them, and a per-ply history stack.

use crate::movegen::{castling_path, generate_moves, is_square_attacked, CastleSide};
use crate::Bitboard;
use movegen_core::{Color, FenCastling, FenError, FenParser, Move, Piece, PieceKind, Square};
use std::fmt;
use thiserror::Error;

/// Plies of history reserved up front; deeper play grows the stack.
const HISTORY_CAPACITY: usize = 256;

/// Reasons a FEN record cannot become a [`Position`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PositionError {
    #[error(transparent)]
    Fen(#[from] FenError),

    #[error("{0} has no king")]
    MissingKing(Color),

    #[error("{0} has more than one king")]
    ExtraKing(Color),

    #[error("pawn on back rank at {0}")]
    PawnOnBackRank(Square),

    #[error("{0} is in check but it is not their move")]
    OpponentInCheck(Color),
}

/// Reasons a move given as UCI text cannot be played.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoveParseError {
    #[error("malformed move: {0:?}")]
    Malformed(String),

    #[error("illegal move in this position: {0}")]
    Illegal(String),
}

/// Irreversible state, one entry per ply reached.
///
/// Each entry describes the position *after* the move that produced it and
/// is derived by copying its predecessor and amending what the move changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Square a pawn capturing en passant would land on.
    pub en_passant: Option<Square>,
    /// Piece removed by the move that produced this entry.
    pub captured: Option<Piece>,
    /// A set bit on a king or rook home square means that piece has moved
    /// or been captured, so castling with it is gone for good.
    pub castling_moved: Bitboard,
    /// Plies since the last capture or pawn move.
    pub halfmove_clock: u32,
}

/// A chess position that is mutated in place by
/// [`make_move`](Position::make_move) and restored by
/// [`unmake_move`](Position::unmake_move).
///
/// Invariant: `mailbox[s] == Some(p)` exactly when bit `s` is set in
/// `bitboards[p]`, and no square is set in two bitboards.
#[derive(Debug, Clone)]
pub struct Position {
    pub(crate) bitboards: [Bitboard; Piece::COUNT],
    pub(crate) mailbox: [Option<Piece>; 64],
    pub(crate) history: Vec<HistoryEntry>,
    pub(crate) depth: usize,
    pub(crate) side_to_move: Color,
    fullmove_start: u32,
}

impl Position {
    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let mut placement = [None; 64];
        for (file, kind) in BACK_RANK.into_iter().enumerate() {
            placement[file] = Some(Piece::new(Color::White, kind));
            placement[8 + file] = Some(Piece::WhitePawn);
            placement[48 + file] = Some(Piece::BlackPawn);
            placement[56 + file] = Some(Piece::new(Color::Black, kind));
        }

        Self::from_record(&FenParser {
            placement,
            side_to_move: Color::White,
            castling: FenCastling {
                white_short: true,
                white_long: true,
                black_short: true,
                black_long: true,
            },
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        })
    }

    /// Creates a position from a FEN string.
    ///
    /// Castling letters whose king or rook is not on its home square, and an
    /// en passant square no pawn could have just crossed, are dropped. A
    /// record whose side not to move is in check is rejected.
    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        let record = FenParser::parse(fen)?;
        Self::validate(&record)?;
        let position = Self::from_record(&record);
        let them = !position.side_to_move;
        if is_square_attacked(&position, position.king_square(them), position.side_to_move) {
            return Err(PositionError::OpponentInCheck(them));
        }
        tracing::trace!(fen, normalized = %position.to_fen(), "position set up");
        Ok(position)
    }

    fn validate(record: &FenParser) -> Result<(), PositionError> {
        for color in Color::ALL {
            let king = Some(Piece::new(color, PieceKind::King));
            match record.placement.iter().filter(|&&p| p == king).count() {
                0 => return Err(PositionError::MissingKing(color)),
                1 => {}
                _ => return Err(PositionError::ExtraKing(color)),
            }
        }

        for sq in Square::all() {
            let back_rank = sq.rank_index() == 0 || sq.rank_index() == 7;
            let is_pawn = record.placement[sq.index() as usize]
                .is_some_and(|p| p.kind() == PieceKind::Pawn);
            if back_rank && is_pawn {
                return Err(PositionError::PawnOnBackRank(sq));
            }
        }

        Ok(())
    }

    fn from_record(record: &FenParser) -> Self {
        let mut position = Position {
            bitboards: [Bitboard::EMPTY; Piece::COUNT],
            mailbox: [None; 64],
            history: Vec::with_capacity(HISTORY_CAPACITY),
            depth: 0,
            side_to_move: record.side_to_move,
            fullmove_start: record.fullmove_number.max(1),
        };

        for sq in Square::all() {
            if let Some(piece) = record.placement[sq.index() as usize] {
                position.put_piece(piece, sq);
            }
        }

        let letters = record.castling;
        let mut castling_moved = Bitboard::EMPTY;
        for (color, side, granted) in [
            (Color::White, CastleSide::Short, letters.white_short),
            (Color::White, CastleSide::Long, letters.white_long),
            (Color::Black, CastleSide::Short, letters.black_short),
            (Color::Black, CastleSide::Long, letters.black_long),
        ] {
            let path = castling_path(color, side);
            let in_place = position.piece_at(path.king_from)
                == Some(Piece::new(color, PieceKind::King))
                && position.piece_at(path.rook_from) == Some(Piece::new(color, PieceKind::Rook));
            if !(granted && in_place) {
                castling_moved |= Bitboard::from_square(path.rook_from);
            }
        }

        let en_passant = record
            .en_passant
            .filter(|&target| position.en_passant_plausible(target));

        position.history.push(HistoryEntry {
            en_passant,
            captured: None,
            castling_moved,
            halfmove_clock: record.halfmove_clock,
        });
        position
    }

    /// True if the side not to move can have just double-pushed past `target`.
    fn en_passant_plausible(&self, target: Square) -> bool {
        let us = self.side_to_move;
        let them = !us;
        let expected_rank = match us {
            Color::White => 5,
            Color::Black => 2,
        };
        target.rank_index() == expected_rank
            && self.piece_at(target).is_none()
            && self.piece_at(target.offset(us.pawn_push())).is_none()
            && self.piece_at(target.offset(them.pawn_push()))
                == Some(Piece::new(them, PieceKind::Pawn))
    }

    /// Converts the position to a FEN string.
    pub fn to_fen(&self) -> String {
        FenParser {
            placement: self.mailbox,
            side_to_move: self.side_to_move,
            castling: FenCastling {
                white_short: self.can_castle(Color::White, CastleSide::Short),
                white_long: self.can_castle(Color::White, CastleSide::Long),
                black_short: self.can_castle(Color::Black, CastleSide::Short),
                black_long: self.can_castle(Color::Black, CastleSide::Long),
            },
            en_passant: self.en_passant(),
            halfmove_clock: self.halfmove_clock(),
            fullmove_number: self.fullmove_number(),
        }
        .to_fen()
    }

    /// Returns the piece on the given square, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.mailbox[sq.index() as usize]
    }

    /// The whole square-to-piece array, a1 first.
    #[inline]
    pub fn mailbox(&self) -> &[Option<Piece>; 64] {
        &self.mailbox
    }

    /// Squares holding the given piece.
    #[inline]
    pub fn bitboard(&self, piece: Piece) -> Bitboard {
        self.bitboards[piece.index()]
    }

    /// Returns a bitboard of pieces of the given color and kind.
    #[inline]
    pub fn pieces(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.bitboards[Piece::new(color, kind).index()]
    }

    /// Squares holding any piece of the given color.
    #[inline]
    pub fn color_occupancy(&self, color: Color) -> Bitboard {
        let base = color.index() * 6;
        self.bitboards[base..base + 6]
            .iter()
            .fold(Bitboard::EMPTY, |acc, &bb| acc | bb)
    }

    /// Returns a bitboard of all occupied squares.
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.bitboards
            .iter()
            .fold(Bitboard::EMPTY, |acc, &bb| acc | bb)
    }

    /// Square of the king of `color`.
    ///
    /// Every position built through [`Position::from_fen`] has exactly one
    /// king per side; the result is meaningless otherwise.
    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.pieces(color, PieceKind::King).lsb()
    }

    /// The side to move.
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// The history entry for the current ply.
    #[inline]
    pub fn current(&self) -> &HistoryEntry {
        &self.history[self.depth]
    }

    /// En passant target square (if any).
    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.current().en_passant
    }

    /// Home squares whose king or rook has moved or been captured.
    #[inline]
    pub fn castling_moved(&self) -> Bitboard {
        self.current().castling_moved
    }

    /// Whether `color` still has the right to castle on `side`.
    ///
    /// This says nothing about whether castling is legal right now.
    #[inline]
    pub fn can_castle(&self, color: Color, side: CastleSide) -> bool {
        let path = castling_path(color, side);
        let homes = Bitboard::from_square(path.king_from) | Bitboard::from_square(path.rook_from);
        (self.castling_moved() & homes).is_empty()
    }

    /// Halfmove clock for the 50-move rule.
    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.current().halfmove_clock
    }

    /// Fullmove number (starts at 1, increments after Black's move).
    pub fn fullmove_number(&self) -> u32 {
        let started_black = (self.depth % 2 == 1) == (self.side_to_move == Color::White);
        let plies = self.depth as u32 + u32::from(started_black);
        self.fullmove_start + plies / 2
    }

    /// Plies made since the position was set up.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Checks the mailbox/bitboard invariant on all 64 squares.
    pub fn is_consistent(&self) -> bool {
        let mut seen = Bitboard::EMPTY;
        for piece in Piece::ALL {
            let bb = self.bitboard(piece);
            if (seen & bb).is_not_empty() {
                return false;
            }
            seen |= bb;
        }

        Square::all().all(|sq| {
            let from_boards = Piece::ALL.into_iter().find(|&p| self.bitboard(p).contains(sq));
            from_boards == self.piece_at(sq)
        })
    }

    /// Resolves UCI text (`e2e4`, `e7e8q`) against the legal moves.
    pub fn find_move(&self, text: &str) -> Result<Move, MoveParseError> {
        let (from, to, promotion) =
            Move::parse_uci(text).ok_or_else(|| MoveParseError::Malformed(text.to_string()))?;

        generate_moves(self)
            .iter()
            .copied()
            .find(|m| m.from() == from && m.to() == to && m.promotion() == promotion)
            .ok_or_else(|| MoveParseError::Illegal(text.to_string()))
    }

    /// Parses and makes a move given as UCI text.
    pub fn play(&mut self, text: &str) -> Result<Move, MoveParseError> {
        let mv = self.find_move(text)?;
        self.make_move(mv);
        Ok(mv)
    }

    #[inline]
    pub(crate) fn put_piece(&mut self, piece: Piece, sq: Square) {
        self.bitboards[piece.index()] ^= Bitboard::from_square(sq);
        self.mailbox[sq.index() as usize] = Some(piece);
    }

    #[inline]
    pub(crate) fn remove_piece(&mut self, piece: Piece, sq: Square) {
        self.bitboards[piece.index()] ^= Bitboard::from_square(sq);
        self.mailbox[sq.index() as usize] = None;
    }

    #[inline]
    pub(crate) fn move_piece(&mut self, piece: Piece, from: Square, to: Square) {
        self.bitboards[piece.index()] ^= Bitboard::from_square(from) | Bitboard::from_square(to);
        self.mailbox[from.index() as usize] = None;
        self.mailbox[to.index() as usize] = Some(piece);
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

/// Entries above the current ply are leftovers from unmade moves and take no
/// part in equality.
impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.bitboards == other.bitboards
            && self.mailbox == other.mailbox
            && self.side_to_move == other.side_to_move
            && self.depth == other.depth
            && self.fullmove_start == other.fullmove_start
            && self.history[..=self.depth] == other.history[..=other.depth]
    }
}

impl Eq for Position {}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8u8 {
                let c = self
                    .piece_at(Square::from_bit(rank * 8 + file))
                    .map_or('.', Piece::to_fen_char);
                write!(f, "{} ", c)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "  a b c d e f g h")?;
        writeln!(f)?;
        write!(f, "Fen: {}", self.to_fen())
    }
}
