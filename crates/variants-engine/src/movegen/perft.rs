//! Perft (performance test) for move generator validation.
//!
//! Perft counts the number of leaf nodes at a given depth, which can be
//! compared against known-correct values to validate the move generator.
//! Each duck placement counts as its own ply, and a promotion counts once
//! (with the default target) rather than once per promotion piece.

use crate::Game;

/// Counts the number of leaf nodes at the given depth.
pub fn perft(game: &Game, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut scratch = game.clone();
    let moves = scratch.all_legal_moves();

    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for m in &moves {
        let mut next = game.clone();
        next.commit(*m);
        nodes += perft(&next, depth - 1);
    }
    nodes
}

/// Perft with divide - shows node count for each move at depth-1.
/// Useful for debugging to identify which moves have incorrect counts.
pub fn perft_divide(game: &Game, depth: u32) -> Vec<(String, u64)> {
    let mut scratch = game.clone();
    let moves = scratch.all_legal_moves();
    let mut results = Vec::with_capacity(moves.len());

    for m in &moves {
        let mut next = game.clone();
        next.commit(*m);
        let nodes = if depth > 1 {
            perft(&next, depth - 1)
        } else {
            1
        };
        results.push((m.to_notation(), nodes));
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}
