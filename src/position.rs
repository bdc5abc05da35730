//! Game position and reversible move execution.
//!
//! This module owns the canonical game state:
//! - Fence sets for both orientations
//! - Token cells and remaining fence counts for both players
//! - Side to move
//!
//! Moves are applied and reverted in place. Every `make_*` has an `unmake_*`
//! that restores the position exactly, so the search can walk the tree on a
//! single mutable `Position`. Calls must nest: an unmake always undoes the
//! most recent make.
//!
//! The make functions trust their caller; preconditions are only checked by
//! debug assertions. [`Position::play`] is the validated entry point for moves
//! that come from outside the engine.

use std::fmt;

use thiserror::Error;

use crate::constants::{
    FENCE_N, FENCES_PER_PLAYER, MAX_INDEX, N, PLAYER_ONE_GOAL, PLAYER_TWO_GOAL, START_COL,
};
use crate::movegen::{legal_token_moves, pseudo_legal_fences};
use crate::moves::{Direction, FenceCell, FenceSet, Move, Orientation};
use crate::path::paths_exist;

/// Player identifier.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[repr(u8)]
pub enum Side {
    /// Starts on the last row, moves first, races to row 0.
    One = 1,
    /// Starts on row 0, races to the last row.
    Two = 2,
}

impl Side {
    #[inline]
    pub const fn opponent(self) -> Side {
        match self {
            Side::One => Side::Two,
            Side::Two => Side::One,
        }
    }

    /// Array index for per-player fields.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize - 1
    }

    #[inline]
    pub const fn goal_row(self) -> u8 {
        match self {
            Side::One => PLAYER_ONE_GOAL,
            Side::Two => PLAYER_TWO_GOAL,
        }
    }

    /// Board symbol for this player's token.
    pub const fn symbol(self) -> char {
        match self {
            Side::One => 'X',
            Side::Two => 'O',
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", *self as u8)
    }
}

/// A token location on the 9x9 board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(C)]
pub struct Cell {
    pub row: u8,
    pub col: u8,
}

impl Cell {
    pub const fn new(row: u8, col: u8) -> Cell {
        Cell { row, col }
    }

    /// The cell reached by moving `dir`. Only meaningful for legal moves.
    #[inline]
    fn offset(self, dir: Direction, sign: i8) -> Cell {
        let (dr, dc) = dir.delta();
        let row = self.row as i8 + sign * dr;
        let col = self.col as i8 + sign * dc;
        debug_assert!((0..N as i8).contains(&row) && (0..N as i8).contains(&col));
        Cell::new(row as u8, col as u8)
    }
}

/// Result of attempting to play an externally supplied move.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("Illegal move: the game is already over")]
    GameOver,
    #[error("Illegal move: pawn cannot move {0}")]
    IllegalStep(Direction),
    #[error("Illegal move: no fences left")]
    NoFencesLeft,
    #[error("Illegal move: fence overlaps or crosses another fence")]
    FenceOverlap,
    #[error("Illegal move: fence would cut a player off from their goal")]
    BlocksPath,
}

/// A game position.
///
/// A fixed-size value type; cloning is a plain copy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(C)]
pub struct Position {
    pub vertical_fences: FenceSet,
    pub horizontal_fences: FenceSet,
    /// Token cells, indexed by [`Side::index`]
    pub pawns: [Cell; 2],
    /// Fences still in hand, indexed by [`Side::index`]
    pub fence_counts: [u8; 2],
    pub to_move: Side,
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl Position {
    /// The starting position: tokens on the centre of their home rows, ten
    /// fences each, player one to move.
    pub fn new() -> Self {
        Position {
            vertical_fences: FenceSet::EMPTY,
            horizontal_fences: FenceSet::EMPTY,
            pawns: [
                Cell::new(MAX_INDEX as u8, START_COL),
                Cell::new(0, START_COL),
            ],
            fence_counts: [FENCES_PER_PLAYER; 2],
            to_move: Side::One,
        }
    }

    #[inline]
    pub const fn side_to_move(&self) -> Side {
        self.to_move
    }

    #[inline]
    pub const fn pawn(&self, side: Side) -> Cell {
        self.pawns[side.index()]
    }

    #[inline]
    pub const fn fences_left(&self, side: Side) -> u8 {
        self.fence_counts[side.index()]
    }

    #[inline]
    pub const fn fences(&self, orientation: Orientation) -> FenceSet {
        match orientation {
            Orientation::Horizontal => self.horizontal_fences,
            Orientation::Vertical => self.vertical_fences,
        }
    }

    #[inline]
    fn fences_mut(&mut self, orientation: Orientation) -> &mut FenceSet {
        match orientation {
            Orientation::Horizontal => &mut self.horizontal_fences,
            Orientation::Vertical => &mut self.vertical_fences,
        }
    }

    #[inline]
    fn switch_side(&mut self) {
        self.to_move = self.to_move.opponent();
    }

    /// True once `side`'s token stands on its goal row.
    #[inline]
    pub const fn has_won(&self, side: Side) -> bool {
        self.pawn(side).row == side.goal_row()
    }

    pub const fn winner(&self) -> Option<Side> {
        if self.has_won(Side::One) {
            Some(Side::One)
        } else if self.has_won(Side::Two) {
            Some(Side::Two)
        } else {
            None
        }
    }

    /// Place a fence for the side to move. The cell must be pseudo-legal.
    pub fn make_fence(&mut self, orientation: Orientation, cell: FenceCell) {
        debug_assert!(
            pseudo_legal_fences(self, orientation).contains(cell),
            "make_fence: fence in the way"
        );
        self.fences_mut(orientation).insert(cell);
        self.fence_counts[self.to_move.index()] -= 1;
        self.switch_side();
    }

    pub fn unmake_fence(&mut self, orientation: Orientation, cell: FenceCell) {
        debug_assert!(
            self.fences(orientation).contains(cell),
            "unmake_fence: no fence at this location"
        );
        self.fences_mut(orientation).remove(cell);
        self.switch_side();
        self.fence_counts[self.to_move.index()] += 1;
    }

    /// Move the token of the side to move. The direction must be legal.
    pub fn make_token_move(&mut self, dir: Direction) {
        debug_assert!(
            legal_token_moves(self).contains(dir),
            "make_token_move: illegal pawn move {dir}"
        );
        let i = self.to_move.index();
        self.pawns[i] = self.pawns[i].offset(dir, 1);
        self.switch_side();
    }

    pub fn unmake_token_move(&mut self, dir: Direction) {
        self.switch_side();
        let i = self.to_move.index();
        self.pawns[i] = self.pawns[i].offset(dir, -1);
    }

    pub fn make_move(&mut self, mv: Move) {
        match mv {
            Move::Token(dir) => self.make_token_move(dir),
            Move::HorizontalFence(cell) => self.make_fence(Orientation::Horizontal, cell),
            Move::VerticalFence(cell) => self.make_fence(Orientation::Vertical, cell),
        }
    }

    pub fn unmake_move(&mut self, mv: Move) {
        match mv {
            Move::Token(dir) => self.unmake_token_move(dir),
            Move::HorizontalFence(cell) => self.unmake_fence(Orientation::Horizontal, cell),
            Move::VerticalFence(cell) => self.unmake_fence(Orientation::Vertical, cell),
        }
    }

    /// Check that `mv` is fully legal here.
    pub fn validate(&self, mv: Move) -> Result<(), MoveError> {
        if self.winner().is_some() {
            return Err(MoveError::GameOver);
        }
        let (orientation, cell) = match mv {
            Move::Token(dir) => {
                return if legal_token_moves(self).contains(dir) {
                    Ok(())
                } else {
                    Err(MoveError::IllegalStep(dir))
                };
            }
            Move::HorizontalFence(cell) => (Orientation::Horizontal, cell),
            Move::VerticalFence(cell) => (Orientation::Vertical, cell),
        };

        if self.fences_left(self.to_move) == 0 {
            return Err(MoveError::NoFencesLeft);
        }
        if !pseudo_legal_fences(self, orientation).contains(cell) {
            return Err(MoveError::FenceOverlap);
        }

        let mut after = *self;
        after.make_fence(orientation, cell);
        if paths_exist(&after) {
            Ok(())
        } else {
            Err(MoveError::BlocksPath)
        }
    }

    /// Validate and apply a move from outside the engine.
    pub fn play(&mut self, mv: Move) -> Result<(), MoveError> {
        self.validate(mv)?;
        self.make_move(mv);
        Ok(())
    }
}

const SUBSCRIPTS: [char; FENCE_N] = ['₀', '₁', '₂', '₃', '₄', '₅', '₆', '₇'];

/// Board rendering. Fence coordinates are shown as subscripts at the
/// corners they occupy.
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let vertical = |r: usize, c: usize| {
            r < FENCE_N
                && c < FENCE_N
                && self
                    .vertical_fences
                    .contains(FenceCell::new(r as u8, c as u8))
        };
        let horizontal = |r: usize, c: usize| {
            r < FENCE_N
                && c < FENCE_N
                && self
                    .horizontal_fences
                    .contains(FenceCell::new(r as u8, c as u8))
        };

        write!(f, "   ")?;
        for col in 0..N {
            write!(f, " {col} ")?;
            if col < FENCE_N {
                write!(f, "{}", SUBSCRIPTS[col])?;
            }
        }
        writeln!(f)?;

        for row in 0..N {
            write!(f, " {row} ")?;
            for col in 0..N {
                let cell = Cell::new(row as u8, col as u8);
                let ch = if cell == self.pawn(Side::One) {
                    Side::One.symbol()
                } else if cell == self.pawn(Side::Two) {
                    Side::Two.symbol()
                } else {
                    '.'
                };
                write!(f, " {ch} ")?;
                if col < FENCE_N {
                    let wall = vertical(row, col) || (row > 0 && vertical(row - 1, col));
                    write!(f, "{}", if wall { '|' } else { ' ' })?;
                }
            }
            writeln!(f)?;

            if row < FENCE_N {
                write!(f, " {} ", SUBSCRIPTS[row])?;
                for col in 0..N {
                    let wall = horizontal(row, col) || (col > 0 && horizontal(row, col - 1));
                    write!(f, "{}", if wall { "---" } else { "   " })?;
                    if col < FENCE_N {
                        let corner = if horizontal(row, col) {
                            '-'
                        } else if vertical(row, col) {
                            '|'
                        } else {
                            ' '
                        };
                        write!(f, "{corner}")?;
                    }
                }
                writeln!(f)?;
            }
        }

        writeln!(
            f,
            "{} fences: {:2}",
            Side::One.symbol(),
            self.fences_left(Side::One)
        )?;
        writeln!(
            f,
            "{} fences: {:2}",
            Side::Two.symbol(),
            self.fences_left(Side::Two)
        )?;
        write!(f, "{}'s turn", self.to_move.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_position() {
        let pos = Position::new();
        assert_eq!(pos.pawn(Side::One), Cell::new(8, 4));
        assert_eq!(pos.pawn(Side::Two), Cell::new(0, 4));
        assert_eq!(pos.fences_left(Side::One), 10);
        assert_eq!(pos.fences_left(Side::Two), 10);
        assert_eq!(pos.side_to_move(), Side::One);
        assert!(pos.vertical_fences.is_empty());
        assert!(pos.horizontal_fences.is_empty());
        assert_eq!(pos.winner(), None);
    }

    #[test]
    fn test_side_helpers() {
        assert_eq!(Side::One.opponent(), Side::Two);
        assert_eq!(Side::Two.opponent(), Side::One);
        assert_eq!(Side::One.index(), 0);
        assert_eq!(Side::Two.index(), 1);
        assert_eq!(Side::One.goal_row(), 0);
        assert_eq!(Side::Two.goal_row(), 8);
    }

    #[test]
    fn test_token_move_roundtrip() {
        let mut pos = Position::new();
        let before = pos;
        pos.make_token_move(Direction::North);
        assert_eq!(pos.pawn(Side::One), Cell::new(7, 4));
        assert_eq!(pos.side_to_move(), Side::Two);
        pos.unmake_token_move(Direction::North);
        assert_eq!(pos, before);
    }

    #[test]
    fn test_fence_roundtrip_restores_counts() {
        let mut pos = Position::new();
        let before = pos;
        let cell = FenceCell::new(3, 3);
        pos.make_fence(Orientation::Vertical, cell);
        assert!(pos.vertical_fences.contains(cell));
        assert_eq!(pos.fences_left(Side::One), 9);
        assert_eq!(pos.fences_left(Side::Two), 10);
        assert_eq!(pos.side_to_move(), Side::Two);

        pos.make_fence(Orientation::Horizontal, FenceCell::new(5, 5));
        assert_eq!(pos.fences_left(Side::Two), 9);
        pos.unmake_fence(Orientation::Horizontal, FenceCell::new(5, 5));
        assert_eq!(pos.fences_left(Side::Two), 10);

        pos.unmake_fence(Orientation::Vertical, cell);
        assert_eq!(pos, before);
    }

    #[test]
    fn test_has_won_depends_only_on_row() {
        let mut pos = Position::new();
        pos.pawns[Side::One.index()] = Cell::new(0, 7);
        pos.fence_counts = [0, 3];
        pos.horizontal_fences.insert(FenceCell::new(2, 2));
        assert!(pos.has_won(Side::One));
        assert!(!pos.has_won(Side::Two));
        assert_eq!(pos.winner(), Some(Side::One));

        let mut pos = Position::new();
        pos.pawns[Side::Two.index()] = Cell::new(8, 0);
        assert!(pos.has_won(Side::Two));
        assert_eq!(pos.winner(), Some(Side::Two));
    }

    #[test]
    fn test_play_rejects_illegal_moves() {
        let mut pos = Position::new();
        assert_eq!(
            pos.play(Move::Token(Direction::South)),
            Err(MoveError::IllegalStep(Direction::South))
        );

        pos.play(Move::HorizontalFence(FenceCell::new(4, 4))).unwrap();
        // Player two: same cell and its horizontal neighbours are taken, and
        // the crossing vertical fence too.
        assert_eq!(
            pos.play(Move::HorizontalFence(FenceCell::new(4, 5))),
            Err(MoveError::FenceOverlap)
        );
        assert_eq!(
            pos.play(Move::VerticalFence(FenceCell::new(4, 4))),
            Err(MoveError::FenceOverlap)
        );
        assert_eq!(pos.side_to_move(), Side::Two);
    }

    #[test]
    fn test_play_rejects_fence_without_supply() {
        let mut pos = Position::new();
        pos.fence_counts[Side::One.index()] = 0;
        assert_eq!(
            pos.play(Move::VerticalFence(FenceCell::new(0, 0))),
            Err(MoveError::NoFencesLeft)
        );
    }

    #[test]
    fn test_play_rejects_path_blocking_fence() {
        let mut pos = Position::new();
        // Wall off (0, 0)-(0, 1) on the right, with player two inside.
        pos.pawns[Side::Two.index()] = Cell::new(0, 0);
        pos.vertical_fences.insert(FenceCell::new(0, 1));
        let before = pos;
        // A horizontal fence under the two cells seals player two in.
        assert_eq!(
            pos.play(Move::HorizontalFence(FenceCell::new(0, 0))),
            Err(MoveError::BlocksPath)
        );
        assert_eq!(pos, before);
    }

    #[test]
    fn test_validate_checks_without_changing_position() {
        let mut sealed = Position::new();
        sealed.pawns[Side::Two.index()] = Cell::new(0, 0);
        sealed.vertical_fences.insert(FenceCell::new(0, 1));
        let pos = sealed;

        assert_eq!(
            pos.validate(Move::HorizontalFence(FenceCell::new(0, 0))),
            Err(MoveError::BlocksPath)
        );
        assert_eq!(pos.validate(Move::HorizontalFence(FenceCell::new(5, 5))), Ok(()));
        assert_eq!(pos.validate(Move::Token(Direction::North)), Ok(()));
        assert_eq!(pos, sealed);
        assert_eq!(pos.fences_left(Side::One), FENCES_PER_PLAYER);
    }

    #[test]
    fn test_play_after_win_is_rejected() {
        let mut pos = Position::new();
        pos.pawns[Side::One.index()] = Cell::new(0, 0);
        assert_eq!(
            pos.play(Move::Token(Direction::South)),
            Err(MoveError::GameOver)
        );
    }

    #[test]
    fn test_display_shows_pawns_and_fences() {
        let mut pos = Position::new();
        pos.play(Move::HorizontalFence(FenceCell::new(0, 0))).unwrap();
        pos.play(Move::VerticalFence(FenceCell::new(6, 6))).unwrap();
        let text = pos.to_string();
        assert!(text.contains('X'));
        assert!(text.contains('O'));
        assert!(text.contains("---"));
        assert!(text.contains('|'));
        assert!(text.contains("X fences:  9"));
        assert!(text.contains("O fences:  9"));
        assert!(text.ends_with("X's turn"));
    }
}
