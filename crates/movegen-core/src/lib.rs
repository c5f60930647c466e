//! Value types for the move generator.
//!
//! This crate provides the plain data shared by the board and its callers:
//! - [`Color`], [`PieceKind`] and the colored [`Piece`]
//! - [`Square`], [`File`], and [`Rank`] for board coordinates
//! - [`Move`], a 16-bit packed move, and its [`MoveFlag`]
//! - FEN tokenizing and validation ([`FenParser`])
//!
//! Nothing here owns tables or board state; see the `movegen` crate for that.

mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use fen::{FenCastling, FenError, FenParser};
pub use mov::{Move, MoveFlag};
pub use piece::{Piece, PieceKind};
pub use square::{File, Rank, Square};
