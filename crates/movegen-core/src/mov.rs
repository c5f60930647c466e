//! Packed move representation.

use crate::{PieceKind, Square};
use std::fmt;

/// What a move does beyond relocating a piece.
///
/// The discriminant is the 4-bit field stored in the top of a [`Move`].
/// Bit 2 marks captures and bit 3 marks promotions; values 6 and 7 are unused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveFlag {
    /// Non-capturing move of any piece, or a single pawn push.
    Quiet = 0,
    /// Pawn double push from its starting rank.
    DoublePush = 1,
    /// Kingside castling (O-O).
    CastleShort = 2,
    /// Queenside castling (O-O-O).
    CastleLong = 3,
    /// Ordinary capture.
    Capture = 4,
    /// En passant capture.
    EnPassant = 5,
    PromoteKnight = 8,
    PromoteBishop = 9,
    PromoteRook = 10,
    PromoteQueen = 11,
    PromoteCaptureKnight = 12,
    PromoteCaptureBishop = 13,
    PromoteCaptureRook = 14,
    PromoteCaptureQueen = 15,
}

impl MoveFlag {
    const CAPTURE_BIT: u8 = 0b0100;
    const PROMOTION_BIT: u8 = 0b1000;

    /// Quiet promotions in emission order (knight first).
    pub const PROMOTIONS: [MoveFlag; 4] = [
        MoveFlag::PromoteKnight,
        MoveFlag::PromoteBishop,
        MoveFlag::PromoteRook,
        MoveFlag::PromoteQueen,
    ];

    /// Capturing promotions in emission order (knight first).
    pub const PROMOTION_CAPTURES: [MoveFlag; 4] = [
        MoveFlag::PromoteCaptureKnight,
        MoveFlag::PromoteCaptureBishop,
        MoveFlag::PromoteCaptureRook,
        MoveFlag::PromoteCaptureQueen,
    ];

    /// Decodes a 4-bit field. Unused values decode as [`MoveFlag::Quiet`].
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0xF {
            1 => MoveFlag::DoublePush,
            2 => MoveFlag::CastleShort,
            3 => MoveFlag::CastleLong,
            4 => MoveFlag::Capture,
            5 => MoveFlag::EnPassant,
            8 => MoveFlag::PromoteKnight,
            9 => MoveFlag::PromoteBishop,
            10 => MoveFlag::PromoteRook,
            11 => MoveFlag::PromoteQueen,
            12 => MoveFlag::PromoteCaptureKnight,
            13 => MoveFlag::PromoteCaptureBishop,
            14 => MoveFlag::PromoteCaptureRook,
            15 => MoveFlag::PromoteCaptureQueen,
            _ => MoveFlag::Quiet,
        }
    }

    /// Returns the 4-bit field.
    #[inline]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Returns true if the move removes an enemy piece (including en passant).
    #[inline]
    pub const fn is_capture(self) -> bool {
        (self as u8) & Self::CAPTURE_BIT != 0
    }

    /// Returns true if a pawn is promoted.
    #[inline]
    pub const fn is_promotion(self) -> bool {
        (self as u8) & Self::PROMOTION_BIT != 0
    }

    /// Returns true if this is a castling move.
    #[inline]
    pub const fn is_castling(self) -> bool {
        matches!(self, MoveFlag::CastleShort | MoveFlag::CastleLong)
    }

    /// Returns the promotion piece if this is a promotion move.
    #[inline]
    pub const fn promotion_kind(self) -> Option<PieceKind> {
        if !self.is_promotion() {
            return None;
        }
        Some(match (self as u8) & 0b11 {
            0 => PieceKind::Knight,
            1 => PieceKind::Bishop,
            2 => PieceKind::Rook,
            _ => PieceKind::Queen,
        })
    }
}

/// A chess move packed into 16 bits: `flag:4 | from:6 | to:6`.
///
/// A `Move` does not know which piece moves; that is read from the board.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(u16);

impl Move {
    /// A null move (used as placeholder, not a legal move).
    pub const NULL: Move = Move(0);

    /// Creates a new move.
    #[inline]
    pub const fn new(from: Square, to: Square, flag: MoveFlag) -> Self {
        Move(((flag as u16) << 12) | ((from.index() as u16) << 6) | (to.index() as u16))
    }

    /// Creates a quiet move.
    #[inline]
    pub const fn quiet(from: Square, to: Square) -> Self {
        Self::new(from, to, MoveFlag::Quiet)
    }

    /// Creates a plain capture.
    #[inline]
    pub const fn capture(from: Square, to: Square) -> Self {
        Self::new(from, to, MoveFlag::Capture)
    }

    /// Reinterprets a raw 16-bit value.
    #[inline]
    pub const fn from_raw(raw: u16) -> Self {
        Move(raw)
    }

    /// Returns the raw 16-bit value.
    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Returns the source square.
    #[inline]
    pub const fn from(self) -> Square {
        Square::from_bit((self.0 >> 6) as u8)
    }

    /// Returns the destination square.
    #[inline]
    pub const fn to(self) -> Square {
        Square::from_bit(self.0 as u8)
    }

    /// Returns the move flag.
    #[inline]
    pub const fn flag(self) -> MoveFlag {
        MoveFlag::from_bits((self.0 >> 12) as u8)
    }

    /// Returns true if the move captures.
    #[inline]
    pub const fn is_capture(self) -> bool {
        self.flag().is_capture()
    }

    /// Returns the promotion piece, if any.
    #[inline]
    pub const fn promotion(self) -> Option<PieceKind> {
        self.flag().promotion_kind()
    }

    /// Returns the UCI notation for this move (e.g., "e2e4", "e7e8q").
    pub fn to_uci(self) -> String {
        match self.promotion() {
            Some(kind) => format!("{}{}{}", self.from(), self.to(), kind.to_char()),
            None => format!("{}{}", self.from(), self.to()),
        }
    }

    /// Splits UCI text into its squares and optional promotion piece.
    ///
    /// The text alone cannot say whether a move captures or castles; the
    /// board resolves that by matching against its legal moves.
    pub fn parse_uci(s: &str) -> Option<(Square, Square, Option<PieceKind>)> {
        if s.len() < 4 || s.len() > 5 || !s.is_ascii() {
            return None;
        }
        let from = Square::from_algebraic(&s[0..2])?;
        let to = Square::from_algebraic(&s[2..4])?;
        let promotion = match s[4..].chars().next() {
            None => None,
            Some(c) => match PieceKind::from_char(c)? {
                PieceKind::Pawn | PieceKind::King => return None,
                kind => Some(kind),
            },
        };
        Some((from, to, promotion))
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({}, {:?})", self.to_uci(), self.flag())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_FLAGS: [MoveFlag; 14] = [
        MoveFlag::Quiet,
        MoveFlag::DoublePush,
        MoveFlag::CastleShort,
        MoveFlag::CastleLong,
        MoveFlag::Capture,
        MoveFlag::EnPassant,
        MoveFlag::PromoteKnight,
        MoveFlag::PromoteBishop,
        MoveFlag::PromoteRook,
        MoveFlag::PromoteQueen,
        MoveFlag::PromoteCaptureKnight,
        MoveFlag::PromoteCaptureBishop,
        MoveFlag::PromoteCaptureRook,
        MoveFlag::PromoteCaptureQueen,
    ];

    #[test]
    fn move_layout() {
        let m = Move::new(Square::E2, Square::E4, MoveFlag::DoublePush);
        assert_eq!(m.raw(), (1 << 12) | (12 << 6) | 28);
        assert_eq!(m.from(), Square::E2);
        assert_eq!(m.to(), Square::E4);
        assert_eq!(m.flag(), MoveFlag::DoublePush);
    }

    #[test]
    fn flag_bits_decode_to_themselves() {
        for flag in ALL_FLAGS {
            assert_eq!(MoveFlag::from_bits(flag.bits()), flag);
        }
        assert_eq!(MoveFlag::from_bits(6), MoveFlag::Quiet);
        assert_eq!(MoveFlag::from_bits(7), MoveFlag::Quiet);
    }

    #[test]
    fn flag_classification() {
        let captures: Vec<MoveFlag> = ALL_FLAGS.into_iter().filter(|f| f.is_capture()).collect();
        assert_eq!(
            captures,
            vec![
                MoveFlag::Capture,
                MoveFlag::EnPassant,
                MoveFlag::PromoteCaptureKnight,
                MoveFlag::PromoteCaptureBishop,
                MoveFlag::PromoteCaptureRook,
                MoveFlag::PromoteCaptureQueen,
            ]
        );
        assert_eq!(ALL_FLAGS.iter().filter(|f| f.is_promotion()).count(), 8);
        assert!(MoveFlag::CastleShort.is_castling());
        assert!(MoveFlag::CastleLong.is_castling());
        assert!(!MoveFlag::DoublePush.is_castling());
    }

    #[test]
    fn promotion_kinds() {
        assert_eq!(MoveFlag::Quiet.promotion_kind(), None);
        assert_eq!(MoveFlag::EnPassant.promotion_kind(), None);
        for (quiet, capture) in MoveFlag::PROMOTIONS
            .into_iter()
            .zip(MoveFlag::PROMOTION_CAPTURES)
        {
            assert_eq!(quiet.promotion_kind(), capture.promotion_kind());
        }
        assert_eq!(
            MoveFlag::PromoteCaptureQueen.promotion_kind(),
            Some(PieceKind::Queen)
        );
        assert_eq!(
            MoveFlag::PromoteKnight.promotion_kind(),
            Some(PieceKind::Knight)
        );
    }

    #[test]
    fn move_uci() {
        assert_eq!(Move::quiet(Square::G1, Square::F3).to_uci(), "g1f3");
        let promo = Move::new(Square::E7, Square::D8, MoveFlag::PromoteCaptureRook);
        assert_eq!(promo.to_uci(), "e7d8r");
        assert_eq!(format!("{}", promo), "e7d8r");
        assert_eq!(format!("{:?}", Move::NULL), "Move(a1a1, Quiet)");
    }

    #[test]
    fn parse_uci_text() {
        assert_eq!(
            Move::parse_uci("e2e4"),
            Some((Square::E2, Square::E4, None))
        );
        assert_eq!(
            Move::parse_uci("e7e8q"),
            Some((Square::E7, Square::E8, Some(PieceKind::Queen)))
        );
        assert_eq!(Move::parse_uci("e7e8k"), None);
        assert_eq!(Move::parse_uci("e7e8x"), None);
        assert_eq!(Move::parse_uci("e2e9"), None);
        assert_eq!(Move::parse_uci("e2"), None);
        assert_eq!(Move::parse_uci("e2e4qq"), None);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn packed_fields_stay_independent(from in 0u8..64, to in 0u8..64, flag in 0usize..14) {
                let (Some(from), Some(to)) = (Square::from_index(from), Square::from_index(to)) else {
                    unreachable!();
                };
                let m = Move::new(from, to, ALL_FLAGS[flag]);
                prop_assert_eq!(m.from(), from);
                prop_assert_eq!(m.to(), to);
                prop_assert_eq!(m.flag(), ALL_FLAGS[flag]);
                prop_assert_eq!(m.is_capture(), ALL_FLAGS[flag].is_capture());
                prop_assert_eq!(
                    Move::parse_uci(&m.to_uci()),
                    Some((from, to, ALL_FLAGS[flag].promotion_kind()))
                );
            }
        }
    }
}
