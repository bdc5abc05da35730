//! Search tests for quoridor-engine
//!
//! The principal variation search is compared against a plain negamax over
//! fully legal moves. Both must agree on the root score, and the searcher must
//! hand back the root position untouched however the tree was pruned.

use quoridor_engine::constants::{INFINITY, WINNING_SCORE};
use quoridor_engine::movegen::legal_moves;
use quoridor_engine::moves::{Direction, FenceCell, Move};
use quoridor_engine::path::evaluate;
use quoridor_engine::position::{Cell, Position, Side};
use quoridor_engine::search::{Searcher, best_move, best_move_iterative_deepening};

// =============================================================================
// Helper functions
// =============================================================================

/// Full-width negamax with the same scoring conventions as the engine.
fn negamax(pos: &mut Position, depth: u32) -> i32 {
    if pos.winner().is_some() {
        return -(WINNING_SCORE + depth as i32);
    }
    if depth == 0 {
        return evaluate(pos);
    }

    let mut best = -INFINITY;
    for mv in legal_moves(pos) {
        pos.make_move(mv);
        best = best.max(-negamax(pos, depth - 1));
        pos.unmake_move(mv);
    }
    best
}

fn position(p1: (u8, u8), p2: (u8, u8), fences: [u8; 2], to_move: Side) -> Position {
    let mut pos = Position::new();
    pos.pawns = [Cell::new(p1.0, p1.1), Cell::new(p2.0, p2.1)];
    pos.fence_counts = fences;
    pos.to_move = to_move;
    pos
}

fn play(moves: &[&str]) -> Position {
    let mut pos = Position::new();
    for mv in moves {
        pos.play(mv.parse::<Move>().unwrap()).unwrap();
    }
    pos
}

/// Positions cheap enough for a full-width reference search.
fn test_positions() -> Vec<Position> {
    let mut corridor = position((5, 3), (3, 5), [0, 0], Side::One);
    corridor.vertical_fences.insert(FenceCell::new(3, 3));
    corridor.horizontal_fences.insert(FenceCell::new(4, 4));

    vec![
        Position::new(),
        play(&["P N", "HF 1 3", "VF 6 4", "P S"]),
        // Only one side can place fences.
        position((2, 4), (6, 4), [3, 0], Side::One),
        position((2, 4), (6, 4), [0, 3], Side::One),
        // Tokens face each other; jumps decide the race.
        position((4, 4), (3, 4), [0, 0], Side::One),
        position((1, 1), (7, 7), [0, 0], Side::Two),
        corridor,
    ]
}

// =============================================================================
// Agreement with plain negamax
// =============================================================================

#[test]
fn test_pvs_matches_negamax_at_depth_two() {
    for pos in test_positions() {
        let mut scratch = pos;
        let expected = negamax(&mut scratch, 2);
        assert_eq!(scratch, pos);
        let result = Searcher::new(&pos).search(2, &[]);
        assert_eq!(result.score, expected, "\n{pos}");
    }
}

#[test]
fn test_pvs_matches_negamax_without_fences() {
    for pos in test_positions()
        .into_iter()
        .filter(|pos| pos.fence_counts == [0, 0])
    {
        for depth in 1..=4 {
            let mut scratch = pos;
            let expected = negamax(&mut scratch, depth);
            let result = Searcher::new(&pos).search(depth, &[]);
            assert_eq!(result.score, expected, "depth {depth}\n{pos}");
        }
    }
}

#[test]
fn test_deepening_agrees_with_fixed_depth() {
    for pos in test_positions() {
        let fixed = Searcher::new(&pos).search(2, &[]);
        let deepened = Searcher::new(&pos).iterate(2);
        assert_eq!(fixed.score, deepened.score, "\n{pos}");
        assert_eq!(fixed.depth, 2);
        assert_eq!(deepened.depth, 2);
    }
}

#[test]
fn test_bad_hint_does_not_change_score() {
    let pos = position((4, 4), (3, 4), [0, 0], Side::One);
    let plain = Searcher::new(&pos).search(3, &[]);
    // South is legal. EastEast is not legal for player two next, and nobody
    // has fences to place.
    let hint = [
        Move::Token(Direction::South),
        Move::Token(Direction::EastEast),
        Move::VerticalFence(FenceCell::new(0, 0)),
    ];
    let hinted = Searcher::new(&pos).search(3, &hint);
    assert_eq!(plain.score, hinted.score);
}

// =============================================================================
// Position discipline
// =============================================================================

#[test]
fn test_searcher_leaves_position_untouched() {
    for pos in test_positions() {
        let mut searcher = Searcher::new(&pos);
        for depth in 1..=2 {
            let result = searcher.search(depth, &[]);
            assert_eq!(searcher.position(), &pos, "after depth {depth}");
            assert!(result.line.len() <= depth as usize);
        }
        searcher.iterate(2);
        assert_eq!(searcher.position(), &pos);
    }
}

#[test]
fn test_principal_variation_is_playable() {
    for pos in test_positions() {
        let depth = if pos.fence_counts == [0, 0] { 4 } else { 2 };
        let result = Searcher::new(&pos).iterate(depth);
        let mut replay = pos;
        for &mv in &result.line {
            replay.play(mv).unwrap();
        }
        assert_eq!(result.best.map(|best| best.mv), result.line.first().copied());
    }
}

#[test]
fn test_node_count_grows_with_depth() {
    let pos = position((1, 1), (7, 7), [0, 0], Side::Two);
    let shallow = Searcher::new(&pos).search(2, &[]).nodes;
    let deep = Searcher::new(&pos).search(4, &[]).nodes;
    assert!(deep > shallow);
}

// =============================================================================
// Entry points
// =============================================================================

#[test]
fn test_depth_one_from_start_is_token_move() {
    let best = best_move(&Position::new(), 1).unwrap();
    assert!(!best.mv.is_fence());
    let best = best_move_iterative_deepening(&Position::new(), 1).unwrap();
    assert_eq!(best.mv, Move::Token(Direction::North));
}

#[test]
fn test_finds_winning_jump() {
    // Player one jumps over the opponent onto the goal row.
    let pos = position((2, 4), (1, 4), [0, 0], Side::One);
    let best = best_move_iterative_deepening(&pos, 3).unwrap();
    assert_eq!(best.mv, Move::Token(Direction::NorthNorth));
    assert_eq!(best.score, WINNING_SCORE + 2);
}

#[test]
fn test_prefers_faster_win() {
    // Two steps away with nothing in the way and no fences to stop it.
    let pos = position((2, 0), (5, 8), [0, 0], Side::One);
    let best = best_move(&pos, 4).unwrap();
    assert_eq!(best.mv, Move::Token(Direction::North));
    assert_eq!(best.score, WINNING_SCORE + 1);
}

#[test]
fn test_side_two_search() {
    let pos = play(&["P N"]);
    let best = best_move_iterative_deepening(&pos, 2).unwrap();
    assert!(legal_moves(&pos).contains(&best.mv));
}
