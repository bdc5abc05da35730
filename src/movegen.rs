//! Move generation for token steps and fence placements.
//!
//! Token moves are generated fully legal, including the jump rules: a token
//! facing the opponent hops straight over it, or, if the square behind the
//! opponent is walled off, diagonally around it.
//!
//! Fence generation comes in two strengths. [`pseudo_legal_fences`] only
//! enforces that fences do not overlap or cross, which is pure bit twiddling.
//! [`fully_legal_fences`] additionally requires both tokens to keep a path to
//! their goal rows, which costs two path searches per candidate. The search
//! uses the pseudo-legal set and checks paths lazily, one candidate at a time.

use crate::bitboard::{Bitboard, Blockers, Step};
use crate::constants::FENCE_N;
use crate::moves::{Direction, DirectionSet, FenceSet, Move, Orientation};
use crate::path::paths_exist;
use crate::position::Position;

/// Fence cells in the first column of the fence grid.
const FIRST_COL: u64 = 0x0101_0101_0101_0101;

/// Fence cells in the last column of the fence grid.
const LAST_COL: u64 = 0x8080_8080_8080_8080;

/// Fence cells the side to move may use without overlapping or crossing an
/// existing fence. Empty if the side to move has no fences left.
pub fn pseudo_legal_fences(pos: &Position, orientation: Orientation) -> FenceSet {
    if pos.fences_left(pos.side_to_move()) == 0 {
        return FenceSet::EMPTY;
    }

    let v = pos.vertical_fences.bits();
    let h = pos.horizontal_fences.bits();
    let taken = match orientation {
        Orientation::Vertical => v | v << FENCE_N | v >> FENCE_N | h,
        // Row-wise neighbours only; no wrapping into the next fence row.
        Orientation::Horizontal => h | ((h << 1) & !FIRST_COL) | ((h >> 1) & !LAST_COL) | v,
    };
    FenceSet::from_bits(!taken)
}

/// Pseudo-legal fences that leave both tokens a path to their goal rows.
pub fn fully_legal_fences(pos: &Position, orientation: Orientation) -> FenceSet {
    let mut scratch = *pos;
    let mut legal = FenceSet::EMPTY;

    for cell in pseudo_legal_fences(pos, orientation).iter() {
        scratch.make_fence(orientation, cell);
        if paths_exist(&scratch) {
            legal.insert(cell);
        }
        scratch.unmake_fence(orientation, cell);
    }

    legal
}

/// For each orthogonal step: the simple move, the straight jump, and the two
/// diagonal jumps (with the step that reaches them from the opponent's cell).
const JUMP_RULES: [(Step, Direction, Direction, [(Step, Direction); 2]); 4] = [
    (
        Step::Up,
        Direction::North,
        Direction::NorthNorth,
        [(Step::Left, Direction::NorthWest), (Step::Right, Direction::NorthEast)],
    ),
    (
        Step::Right,
        Direction::East,
        Direction::EastEast,
        [(Step::Up, Direction::NorthEast), (Step::Down, Direction::SouthEast)],
    ),
    (
        Step::Left,
        Direction::West,
        Direction::WestWest,
        [(Step::Down, Direction::SouthWest), (Step::Up, Direction::NorthWest)],
    ),
    (
        Step::Down,
        Direction::South,
        Direction::SouthSouth,
        [(Step::Right, Direction::SouthEast), (Step::Left, Direction::SouthWest)],
    ),
];

/// Legal token moves for the side to move.
pub fn legal_token_moves(pos: &Position) -> DirectionSet {
    let side = pos.side_to_move();
    let me = pos.pawn(side);
    let them = pos.pawn(side.opponent());
    let own = Bitboard::square(me.row, me.col);
    let opponent = Bitboard::square(them.row, them.col);
    let blockers = Blockers::from_position(pos);

    let mut moves = DirectionSet::EMPTY;
    for (step, simple, straight, diagonals) in JUMP_RULES {
        let target = blockers.step(own, step);
        if target.is_empty() {
            continue;
        }
        if target != opponent {
            moves.insert(simple);
            continue;
        }
        if !blockers.step(opponent, step).is_empty() {
            moves.insert(straight);
            continue;
        }
        for (side_step, diagonal) in diagonals {
            if !blockers.step(opponent, side_step).is_empty() {
                moves.insert(diagonal);
            }
        }
    }
    moves
}

/// True if `mv` may be played in `pos`.
pub fn is_fully_legal(pos: &Position, mv: Move) -> bool {
    pos.validate(mv).is_ok()
}

/// Every fully legal move: token moves, then horizontal fences, then vertical
/// fences.
pub fn legal_moves(pos: &Position) -> Vec<Move> {
    let mut moves: Vec<Move> = legal_token_moves(pos).iter().map(Move::Token).collect();
    for orientation in Orientation::ALL {
        moves.extend(
            fully_legal_fences(pos, orientation)
                .iter()
                .map(|cell| Move::fence(orientation, cell)),
        );
    }
    moves
}

/// A uniformly random legal move, or `None` if there is none.
pub fn random_legal_move(pos: &Position, rng: &mut fastrand::Rng) -> Option<Move> {
    let moves = legal_moves(pos);
    if moves.is_empty() {
        return None;
    }
    Some(moves[rng.usize(..moves.len())])
}
