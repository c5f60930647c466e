//! Property tests: random legal games and random occupancies.

use movegen::movegen::{
    bishop_attacks, bishop_attacks_slow, queen_attacks, rook_attacks, rook_attacks_slow,
};
use movegen::{generate_moves, in_check, Bitboard, Position};
use movegen_core::Square;
use proptest::prelude::*;

const STARTS: &[&str] = &[
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
    "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
];

fn occupancy() -> impl Strategy<Value = Bitboard> {
    prop_oneof![
        any::<u64>(),
        (any::<u64>(), any::<u64>()).prop_map(|(a, b)| a & b),
        (any::<u64>(), any::<u64>(), any::<u64>()).prop_map(|(a, b, c)| a & b & c),
    ]
    .prop_map(Bitboard)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_walk_keeps_invariants_and_unwinds(
        start in 0..STARTS.len(),
        choices in prop::collection::vec(any::<u16>(), 1..60),
    ) {
        let mut position = Position::from_fen(STARTS[start]).unwrap();
        let mut played = Vec::new();
        let mut snapshots = Vec::new();

        for choice in choices {
            let moves = generate_moves(&position);
            if moves.is_empty() {
                break;
            }
            let mv = moves[choice as usize % moves.len()];
            snapshots.push(position.clone());
            position.make_move(mv);
            prop_assert!(position.is_consistent(), "{:?} broke the mailbox", mv);
            prop_assert!(
                !in_check(&position, !position.side_to_move()),
                "{:?} left its own king in check",
                mv
            );
            played.push(mv);
        }

        while let Some(mv) = played.pop() {
            position.unmake_move(mv);
            let expected = snapshots.pop().unwrap();
            prop_assert_eq!(&position, &expected);
        }
    }

    #[test]
    fn fen_survives_a_random_walk(
        start in 0..STARTS.len(),
        choices in prop::collection::vec(any::<u16>(), 1..30),
    ) {
        let mut position = Position::from_fen(STARTS[start]).unwrap();
        for choice in choices {
            let moves = generate_moves(&position);
            if moves.is_empty() {
                break;
            }
            position.make_move(moves[choice as usize % moves.len()]);
        }

        let fen = position.to_fen();
        let reloaded = Position::from_fen(&fen).unwrap();
        prop_assert_eq!(reloaded.to_fen(), fen);

        let mut ours: Vec<String> = generate_moves(&position).iter().map(|m| m.to_uci()).collect();
        let mut theirs: Vec<String> = generate_moves(&reloaded).iter().map(|m| m.to_uci()).collect();
        ours.sort();
        theirs.sort();
        prop_assert_eq!(ours, theirs);
    }

    #[test]
    fn magic_lookup_matches_reference(sq in 0u8..64, occupied in occupancy()) {
        let sq = Square::from_bit(sq);
        let rook = rook_attacks_slow(sq, occupied);
        let bishop = bishop_attacks_slow(sq, occupied);
        prop_assert_eq!(rook_attacks(sq, occupied), rook);
        prop_assert_eq!(bishop_attacks(sq, occupied), bishop);
        prop_assert_eq!(queen_attacks(sq, occupied), rook | bishop);
    }
}
