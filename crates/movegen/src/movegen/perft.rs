//! Perft (performance test) for move generator validation.
//!
//! Perft counts the number of leaf nodes at a given depth, which can be
//! compared against known-correct values to validate the move generator.

use super::generate_moves;
use crate::Position;
use movegen_core::Move;

/// Counts the number of leaf nodes at the given depth.
///
/// The position is mutated during the walk and restored before returning.
pub fn perft(position: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = generate_moves(position);

    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for &m in &moves {
        position.make_move(m);
        nodes += perft(position, depth - 1);
        position.unmake_move(m);
    }
    nodes
}

/// Perft with divide - node count below each root move, sorted by UCI text.
/// Useful for debugging to identify which moves have incorrect counts.
pub fn perft_divide(position: &mut Position, depth: u32) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }

    let moves = generate_moves(position);
    let mut results = Vec::with_capacity(moves.len());

    for &m in &moves {
        position.make_move(m);
        results.push((m, perft(position, depth - 1)));
        position.unmake_move(m);
    }

    results.sort_by_cached_key(|(m, _)| m.to_uci());
    tracing::trace!(depth, root_moves = results.len(), "divide finished");
    results
}
