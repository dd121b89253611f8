//! Perft (performance test) for move generator validation.
//!
//! Perft counts the leaf nodes of the legal move tree to a fixed depth, which
//! can be compared against known-correct values. Moves are made and taken
//! back through the [`GameState`] journal, so perft exercises apply/undo as
//! well as generation.
//!
//! Counts are in (origin, destination) units: a promotion counts once, and
//! en passant captures are never generated.

use crate::game::{GameState, MoveOptions};

/// Counts the number of leaf nodes at the given depth.
pub fn perft(state: &mut GameState, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = state.generate_moves();

    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for m in &moves {
        state.apply(*m, MoveOptions::UNCHECKED);
        nodes += perft(state, depth - 1);
        state.undo_move();
    }
    nodes
}

/// Perft with divide - node count below each root move.
/// Useful for debugging to identify which moves have incorrect counts.
pub fn perft_divide(state: &mut GameState, depth: u32) -> Vec<(String, u64)> {
    let moves = state.generate_moves();
    let mut results = Vec::with_capacity(moves.len());

    for m in &moves {
        state.apply(*m, MoveOptions::UNCHECKED);
        let nodes = if depth > 1 {
            perft(state, depth - 1)
        } else {
            1
        };
        state.undo_move();
        results.push((m.to_uci(), nodes));
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}
