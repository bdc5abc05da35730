//! Shortest paths to the goal row and the path-difference heuristic.
//!
//! Distances come from a bidirectional flood fill over the padded bitboard:
//! one frontier grows from the token, the other from the whole goal row, and
//! the two take turns expanding one step. The distance is the number of steps
//! taken when they first overlap. If either frontier stops growing before that
//! happens, the token is walled off from its goal.
//!
//! Token jumps are ignored; the distance is a plain step count.

use crate::bitboard::{Bitboard, Blockers};
use crate::constants::NO_PATH;
use crate::position::{Position, Side};

/// Length of the shortest path from `(row, col)` to any cell of `goal`, or
/// `None` if the fences leave no path.
pub fn shortest_path(blockers: &Blockers, row: u8, col: u8, goal: Bitboard) -> Option<u32> {
    let mut reached = Bitboard::square(row, col);
    let mut goal = goal;
    let mut length = 0;

    while !reached.intersects(goal) {
        let previous_reached = reached;
        let previous_goal = goal;

        reached |= blockers.expand(previous_reached);
        length += 1;
        if reached.intersects(goal) {
            return Some(length);
        }

        goal |= blockers.expand(previous_goal);

        // Nothing left to expand into on one side.
        if reached == previous_reached || goal == previous_goal {
            return None;
        }
        length += 1;
    }

    Some(length)
}

/// Shortest path for `side`'s token to its goal row.
#[inline]
pub fn path_length(pos: &Position, side: Side, blockers: &Blockers) -> Option<u32> {
    let pawn = pos.pawn(side);
    shortest_path(blockers, pawn.row, pawn.col, Bitboard::row(side.goal_row()))
}

/// True if both tokens can still reach their goal rows.
pub fn paths_exist(pos: &Position) -> bool {
    evaluate(pos) != NO_PATH
}

/// Path-difference heuristic from the point of view of the side to move.
///
/// Returns `2 * (opponent distance - own distance) + 1`, which is always odd
/// and therefore never equal to [`NO_PATH`]. The doubling keeps room for the
/// side-to-move tempo, worth the `+ 1`. Returns [`NO_PATH`] if either token is
/// cut off from its goal.
pub fn evaluate(pos: &Position) -> i32 {
    let blockers = Blockers::from_position(pos);
    let own = pos.side_to_move();

    let (Some(own_length), Some(opponent_length)) = (
        path_length(pos, own, &blockers),
        path_length(pos, own.opponent(), &blockers),
    ) else {
        return NO_PATH;
    };

    let score = 2 * (opponent_length as i32 - own_length as i32) + 1;
    debug_assert!(score != NO_PATH, "path dif heuristic cannot be zero");
    score
}
