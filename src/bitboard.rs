//! Wide bitboards over the padded 11x11 grid.
//!
//! Token positions, path frontiers and fence blockers are all `Bitboard`s.
//! Bit `(row + 1) * W + (col + 1)` addresses board cell `(row, col)`; the
//! remaining bits form the boundary ring (plus the unused top bits of the
//! `u128`) and are never playable.
//!
//! [`Blockers`] holds the four directional blocked-movement masks derived from
//! the fence sets. They are destination-framed: a bit is set on every cell that
//! a step in that direction may not land on. The boundary ring is set in all
//! four masks, so a step off the board is rejected like a step through a fence.

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

use crate::constants::{FENCE_N, N, W};
use crate::moves::FenceSet;
use crate::position::Position;

/// Padded-grid bit index of board cell `(row, col)`.
#[inline]
pub const fn padded_index(row: usize, col: usize) -> usize {
    (row + 1) * W + col + 1
}

const ROW_BITS: u128 = (1 << N) - 1;

const fn board_mask() -> u128 {
    let mut mask = 0u128;
    let mut row = 0;
    while row < N {
        mask |= ROW_BITS << padded_index(row, 0);
        row += 1;
    }
    mask
}

/// One of the four orthogonal single steps on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Step {
    Up,
    Down,
    Left,
    Right,
}

impl Step {
    pub const ALL: [Step; 4] = [Step::Up, Step::Down, Step::Left, Step::Right];
}

/// A set of cells on the padded grid.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Bitboard(u128);

impl Bitboard {
    pub const EMPTY: Bitboard = Bitboard(0);

    /// Every playable cell.
    pub const BOARD: Bitboard = Bitboard(board_mask());

    /// The boundary ring and the unused high bits.
    pub const BORDER: Bitboard = Bitboard(!board_mask());

    /// The single board cell `(row, col)`.
    #[inline]
    pub const fn square(row: u8, col: u8) -> Bitboard {
        debug_assert!((row as usize) < N && (col as usize) < N);
        Bitboard(1 << padded_index(row as usize, col as usize))
    }

    /// All nine cells of a board row.
    #[inline]
    pub const fn row(row: u8) -> Bitboard {
        debug_assert!((row as usize) < N);
        Bitboard(ROW_BITS << padded_index(row as usize, 0))
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn intersects(self, other: Bitboard) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Move every cell one step. Bits shifted past either end of the `u128`
    /// are dropped; anything shifted off the board lands on the boundary.
    #[inline]
    pub const fn shift(self, step: Step) -> Bitboard {
        match step {
            Step::Up => Bitboard(self.0 >> W),
            Step::Down => Bitboard(self.0 << W),
            Step::Left => Bitboard(self.0 >> 1),
            Step::Right => Bitboard(self.0 << 1),
        }
    }
}

impl BitOr for Bitboard {
    type Output = Bitboard;

    #[inline]
    fn bitor(self, rhs: Bitboard) -> Bitboard {
        Bitboard(self.0 | rhs.0)
    }
}

impl BitOrAssign for Bitboard {
    #[inline]
    fn bitor_assign(&mut self, rhs: Bitboard) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Bitboard {
    type Output = Bitboard;

    #[inline]
    fn bitand(self, rhs: Bitboard) -> Bitboard {
        Bitboard(self.0 & rhs.0)
    }
}

impl BitAndAssign for Bitboard {
    #[inline]
    fn bitand_assign(&mut self, rhs: Bitboard) {
        self.0 &= rhs.0;
    }
}

impl Not for Bitboard {
    type Output = Bitboard;

    #[inline]
    fn not(self) -> Bitboard {
        Bitboard(!self.0)
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bitboard({:#x})", self.0)
    }
}

/// Directional blocked-movement masks for one fence configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Blockers {
    pub up: Bitboard,
    pub down: Bitboard,
    pub left: Bitboard,
    pub right: Bitboard,
}

impl Blockers {
    /// Derive the masks from raw fence sets.
    ///
    /// A horizontal fence at `(r, c)` stops up-steps landing on `(r, c)` and
    /// `(r, c + 1)`, and down-steps landing on the two cells below them. A
    /// vertical fence at `(r, c)` stops right-steps landing on `(r, c + 1)` and
    /// `(r + 1, c + 1)`, and left-steps landing on the two cells beside them.
    pub fn new(vertical: FenceSet, horizontal: FenceSet) -> Blockers {
        let fence_row = (1u64 << FENCE_N) - 1;
        let mut up = 0u128;
        let mut right = 0u128;

        for r in 0..FENCE_N {
            let h = ((horizontal.bits() >> (r * FENCE_N)) & fence_row) as u128;
            let v = ((vertical.bits() >> (r * FENCE_N)) & fence_row) as u128;

            // Each fence spans two cells.
            let h = h << padded_index(r, 0);
            up |= h | h << 1;
            let v = v << padded_index(r, 1);
            right |= v | v << W;
        }

        let up = Bitboard(up);
        let right = Bitboard(right);

        Blockers {
            up: up | Bitboard::BORDER,
            down: up.shift(Step::Down) | Bitboard::BORDER,
            left: right.shift(Step::Left) | Bitboard::BORDER,
            right: right | Bitboard::BORDER,
        }
    }

    /// Masks for the fences currently on the board.
    #[inline]
    pub fn from_position(pos: &Position) -> Blockers {
        Blockers::new(pos.vertical_fences, pos.horizontal_fences)
    }

    #[inline]
    pub const fn get(&self, step: Step) -> Bitboard {
        match step {
            Step::Up => self.up,
            Step::Down => self.down,
            Step::Left => self.left,
            Step::Right => self.right,
        }
    }

    /// Cells reachable from `from` by one unblocked step in `step`'s direction.
    #[inline]
    pub fn step(&self, from: Bitboard, step: Step) -> Bitboard {
        from.shift(step) & !self.get(step)
    }

    /// Cells reachable from `from` by one unblocked step in any direction.
    #[inline]
    pub fn expand(&self, from: Bitboard) -> Bitboard {
        self.step(from, Step::Up)
            | self.step(from, Step::Down)
            | self.step(from, Step::Left)
            | self.step(from, Step::Right)
    }
}
