//! Constants for board dimensions, fence supply, and search scores.
//!
//! The token board is 9x9. Pathfinding works on an 11x11 grid that pads the
//! board with one ring of boundary cells, so a step off the board always lands
//! on a cell that is marked as blocked.
//!
//! Fences live on their own 8x8 grid: fence cell `(r, c)` sits at the corner
//! shared by board cells `(r, c)`, `(r, c + 1)`, `(r + 1, c)` and
//! `(r + 1, c + 1)`, and is addressed by bit `r * 8 + c` of a `u64`.

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size (NxN) for tokens.
pub const N: usize = 9;

/// Highest row or column index on the token board.
pub const MAX_INDEX: usize = N - 1;

/// Width of the padded pathfinding grid (one boundary column on each side).
pub const W: usize = N + 2;

/// Width of the fence placement grid.
pub const FENCE_N: usize = N - 1;

/// Number of fence placement cells.
pub const FENCE_CELLS: usize = FENCE_N * FENCE_N;

// =============================================================================
// Game Setup
// =============================================================================

/// Fences each player starts with.
pub const FENCES_PER_PLAYER: u8 = 10;

/// Starting column for both tokens.
pub const START_COL: u8 = (MAX_INDEX / 2) as u8;

/// Goal row for player one (who starts on the last row).
pub const PLAYER_ONE_GOAL: u8 = 0;

/// Goal row for player two (who starts on row 0).
pub const PLAYER_TWO_GOAL: u8 = MAX_INDEX as u8;

// =============================================================================
// Scores
// =============================================================================

/// Base score for a decided game. Offset by the remaining depth so shorter
/// wins score higher.
pub const WINNING_SCORE: i32 = 1000;

/// Heuristic value of a position in which some token has no path to its goal.
///
/// Every real heuristic value is odd, and every mate score exceeds
/// `WINNING_SCORE`, so 0 is never produced by a legal position.
pub const NO_PATH: i32 = 0;

/// Search window bound. `-INFINITY` stays representable.
pub const INFINITY: i32 = i32::MAX;

/// Default depth for the engine player.
pub const DEFAULT_AI_DEPTH: u32 = 4;
