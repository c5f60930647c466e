//! Bitboard legal move generator.
//!
//! This crate provides:
//! - [`Bitboard`] - 64-bit square sets and the bit tricks behind them
//! - [`Position`] - piece bitboards, a mailbox and a per-ply history stack
//! - legal move generation with magic-bitboard slider lookups
//! - in-place [`make_move`](Position::make_move) /
//!   [`unmake_move`](Position::unmake_move)
//! - [`perft`] node counting
//!
//! # Architecture
//!
//! Attack geometry is derived from square coordinates: leaper tables at
//! compile time, magic slider tables once on first use. A [`Position`] is
//! owned by one caller at a time and mutated in place; searches that fork
//! clone it.
//!
//! # Example
//!
//! ```
//! use movegen::{generate_moves, perft, Position};
//!
//! let mut position = Position::startpos();
//! assert_eq!(generate_moves(&position).len(), 20);
//!
//! position.play("e2e4").unwrap();
//! position.play("e7e5").unwrap();
//! assert_eq!(
//!     position.to_fen(),
//!     "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2"
//! );
//! let nodes = perft(&mut position, 1);
//! assert_eq!(nodes as usize, generate_moves(&position).len());
//! ```

mod bitboard;
pub mod movegen;
mod position;

pub use bitboard::{bit_scan_forward, Bitboard};
pub use movegen::perft::{perft, perft_divide};
pub use movegen::{
    attackers_to, between, checkers, generate_moves, generate_moves_for, in_check,
    is_square_attacked, line, CastleSide, MoveList,
};
pub use position::{HistoryEntry, MoveParseError, Position, PositionError};
