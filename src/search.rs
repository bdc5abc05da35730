//! Negamax principal variation search with iterative deepening.
//!
//! This module implements:
//! - Fail-soft alpha-beta in negamax form (scores are always from the point
//!   of view of the side to move)
//! - Principal variation search: the hinted move is searched with the full
//!   window, every later move with a null window, re-searched when the probe
//!   lands strictly inside `(alpha, beta)`
//! - Iterative deepening, feeding each iteration's best line back in as the
//!   move-ordering hint for the next
//!
//! The search walks the tree on a single [`Position`], applying a move before
//! descending and reverting it right after the recursive call returns, on every
//! path including beta cutoffs. Fence candidates come from the pseudo-legal
//! generator; a fence that cuts a token off from its goal is detected after it
//! is applied and skipped there, so full legality is only paid for moves the
//! search actually reaches.
//!
//! Move order at every node: hint, token moves, horizontal fences, vertical
//! fences.

use crate::constants::{INFINITY, NO_PATH, WINNING_SCORE};
use crate::movegen::{legal_token_moves, pseudo_legal_fences};
use crate::moves::{Move, Orientation, ScoredMove};
use crate::path::evaluate;
use crate::position::Position;

/// Outcome of one fixed-depth search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchResult {
    /// Best root move, `None` if the root has no move to make.
    pub best: Option<ScoredMove>,
    /// Score of the root for the side to move.
    pub score: i32,
    /// Principal variation, starting with the best move.
    pub line: Vec<Move>,
    pub depth: u32,
    /// Nodes visited by this searcher so far.
    pub nodes: u64,
}

/// Search state: the position being walked and a node counter.
pub struct Searcher {
    pos: Position,
    nodes: u64,
}

impl Searcher {
    pub fn new(pos: &Position) -> Self {
        Self { pos: *pos, nodes: 0 }
    }

    /// The position the searcher walks. Identical to the root between
    /// searches.
    pub fn position(&self) -> &Position {
        &self.pos
    }

    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Search to exactly `depth` plies, trying `hint` first along the way.
    ///
    /// # Panics
    /// If `depth` is 0.
    pub fn search(&mut self, depth: u32, hint: &[Move]) -> SearchResult {
        assert!(depth > 0, "search depth must be positive");

        let mut line = Vec::with_capacity(depth as usize);
        let score = self.pvs(depth, -INFINITY, INFINITY, hint, &mut line);

        SearchResult {
            best: line.first().map(|&mv| ScoredMove { mv, score }),
            score,
            line,
            depth,
            nodes: self.nodes,
        }
    }

    /// Search depths `1..=max_depth`, each seeded with the previous line.
    ///
    /// # Panics
    /// If `max_depth` is 0.
    pub fn iterate(&mut self, max_depth: u32) -> SearchResult {
        assert!(max_depth > 0, "search depth must be positive");

        let mut result = self.search(1, &[]);
        log_iteration(&result);
        for depth in 2..=max_depth {
            result = self.search(depth, &result.line);
            log_iteration(&result);
        }
        result
    }

    fn pvs(
        &mut self,
        depth: u32,
        mut alpha: i32,
        beta: i32,
        hint: &[Move],
        line: &mut Vec<Move>,
    ) -> i32 {
        self.nodes += 1;
        line.clear();

        // Terminal states: the previous mover has just won.
        if self.pos.winner().is_some() {
            return -(WINNING_SCORE + depth as i32);
        }
        if depth == 0 {
            return evaluate(&self.pos);
        }

        let tokens = legal_token_moves(&self.pos);
        let horizontal = pseudo_legal_fences(&self.pos, Orientation::Horizontal);
        let vertical = pseudo_legal_fences(&self.pos, Orientation::Vertical);

        // The remainder of the hint line is offered to every child, not only
        // to the hinted one.
        let (hint_move, child_hint) = match hint.split_first() {
            Some((&mv, rest)) => (Some(mv), rest),
            None => (None, &[][..]),
        };
        let hint_move = hint_move.filter(|&mv| match mv {
            Move::Token(dir) => tokens.contains(dir),
            Move::HorizontalFence(cell) => horizontal.contains(cell),
            Move::VerticalFence(cell) => vertical.contains(cell),
        });

        let candidates = hint_move.into_iter().chain(
            tokens
                .iter()
                .map(Move::Token)
                .chain(horizontal.iter().map(Move::HorizontalFence))
                .chain(vertical.iter().map(Move::VerticalFence))
                .filter(move |&mv| Some(mv) != hint_move),
        );

        let mut best = -INFINITY;
        let mut first = true;
        let mut child_line = Vec::with_capacity(depth as usize);

        for mv in candidates {
            self.pos.make_move(mv);

            if mv.is_fence() && evaluate(&self.pos) == NO_PATH {
                self.pos.unmake_move(mv);
                continue;
            }

            let score = if first {
                -self.pvs(depth - 1, -beta, -alpha, child_hint, &mut child_line)
            } else {
                let probe = -self.pvs(depth - 1, -alpha - 1, -alpha, child_hint, &mut child_line);
                if probe > alpha && probe < beta {
                    -self.pvs(depth - 1, -beta, -alpha, child_hint, &mut child_line)
                } else {
                    probe
                }
            };

            self.pos.unmake_move(mv);
            first = false;

            if score > best {
                best = score;
                line.clear();
                line.push(mv);
                line.extend_from_slice(&child_line);
            }
            if score > alpha {
                alpha = score;
            }
            if score >= beta {
                break;
            }
        }

        best
    }
}

fn log_iteration(result: &SearchResult) {
    log::debug!(
        "depth {} score {} nodes {} pv {}",
        result.depth,
        result.score,
        result.nodes,
        format_line(&result.line)
    );
}

/// Moves separated by commas, e.g. `P N, HF 2 3`.
pub fn format_line(line: &[Move]) -> String {
    line.iter()
        .map(Move::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Best move found by a fixed-depth search.
///
/// # Panics
/// If `depth` is 0.
pub fn best_move(pos: &Position, depth: u32) -> Option<ScoredMove> {
    Searcher::new(pos).search(depth, &[]).best
}

/// Best move found by iterative deepening up to `max_depth`.
///
/// # Panics
/// If `max_depth` is 0.
pub fn best_move_iterative_deepening(pos: &Position, max_depth: u32) -> Option<ScoredMove> {
    Searcher::new(pos).iterate(max_depth).best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::{Direction, FenceCell};
    use crate::position::{Cell, Side};

    #[test]
    fn test_depth_one_from_start_steps_forward() {
        let best = best_move(&Position::new(), 1).unwrap();
        assert_eq!(best.mv, Move::Token(Direction::North));
        // Own distance 7, opponent 8, opponent to move: 2 * (7 - 8) + 1 = -1.
        assert_eq!(best.score, 1);
    }

    #[test]
    fn test_takes_immediate_win() {
        let mut pos = Position::new();
        pos.pawns[Side::One.index()] = Cell::new(1, 2);
        let best = best_move(&pos, 2).unwrap();
        assert_eq!(best.mv, Move::Token(Direction::North));
        assert_eq!(best.score, WINNING_SCORE + 1);
    }

    #[test]
    fn test_blocks_opponent_about_to_win() {
        let mut pos = Position::new();
        pos.pawns[Side::Two.index()] = Cell::new(7, 0);
        pos.pawns[Side::One.index()] = Cell::new(8, 8);
        let best = best_move(&pos, 2).unwrap();
        assert!(best.mv.is_fence(), "expected a fence, got {}", best.mv);
        assert!(best.score > -WINNING_SCORE);
    }

    #[test]
    fn test_won_position_has_no_move() {
        let mut pos = Position::new();
        pos.pawns[Side::Two.index()] = Cell::new(8, 0);
        assert_eq!(best_move(&pos, 3), None);
    }

    #[test]
    fn test_searcher_restores_position() {
        let mut pos = Position::new();
        pos.play(Move::HorizontalFence(FenceCell::new(6, 3))).unwrap();
        pos.play(Move::Token(Direction::South)).unwrap();
        let mut searcher = Searcher::new(&pos);
        let result = searcher.iterate(2);
        assert!(result.best.is_some());
        assert_eq!(result.line.len(), 2);
        assert_eq!(searcher.position(), &pos);
        assert!(searcher.nodes() > 0);
    }

    #[test]
    fn test_iterate_matches_fixed_depth_score() {
        let pos = Position::new();
        let fixed = Searcher::new(&pos).search(2, &[]);
        let deepened = Searcher::new(&pos).iterate(2);
        assert_eq!(fixed.score, deepened.score);
    }

    #[test]
    #[should_panic(expected = "search depth must be positive")]
    fn test_zero_depth_panics() {
        best_move(&Position::new(), 0);
    }

    #[test]
    fn test_format_line() {
        let line = [
            Move::Token(Direction::North),
            Move::VerticalFence(FenceCell::new(1, 2)),
        ];
        assert_eq!(format_line(&line), "P N, VF 1 2");
    }
}
