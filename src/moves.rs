//! Move representation: token directions, fence cells, and move notation.
//!
//! A move is either a token step (one of twelve [`Direction`]s, four of which
//! are straight jumps and four diagonal jumps around the opponent) or a fence
//! placed on one cell of the 8x8 fence grid in one of two orientations.
//!
//! Sets of candidate moves are kept as bitmasks ([`DirectionSet`],
//! [`FenceSet`]) so generation stays cheap; identity is always the enum.
//!
//! ## Notation
//!
//! - `P <dir>` moves the token, `dir` in `N E S W NN EE SS WW NE NW SE SW`
//! - `HF <row> <col>` places a horizontal fence
//! - `VF <row> <col>` places a vertical fence

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::constants::{FENCE_CELLS, FENCE_N};

/// Direction of a token move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
    NorthNorth,
    EastEast,
    SouthSouth,
    WestWest,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Direction {
    /// All directions in generation order.
    pub const ALL: [Direction; 12] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::NorthNorth,
        Direction::EastEast,
        Direction::SouthSouth,
        Direction::WestWest,
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::SouthEast,
        Direction::SouthWest,
    ];

    /// `(row, col)` change of the moving token. North is towards row 0.
    #[inline]
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Direction::North => (-1, 0),
            Direction::East => (0, 1),
            Direction::South => (1, 0),
            Direction::West => (0, -1),
            Direction::NorthNorth => (-2, 0),
            Direction::EastEast => (0, 2),
            Direction::SouthSouth => (2, 0),
            Direction::WestWest => (0, -2),
            Direction::NorthEast => (-1, 1),
            Direction::NorthWest => (-1, -1),
            Direction::SouthEast => (1, 1),
            Direction::SouthWest => (1, -1),
        }
    }

    pub const fn notation(self) -> &'static str {
        match self {
            Direction::North => "N",
            Direction::East => "E",
            Direction::South => "S",
            Direction::West => "W",
            Direction::NorthNorth => "NN",
            Direction::EastEast => "EE",
            Direction::SouthSouth => "SS",
            Direction::WestWest => "WW",
            Direction::NorthEast => "NE",
            Direction::NorthWest => "NW",
            Direction::SouthEast => "SE",
            Direction::SouthWest => "SW",
        }
    }

    pub fn from_notation(s: &str) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|d| d.notation().eq_ignore_ascii_case(s))
    }

    #[inline]
    const fn bit(self) -> u16 {
        1 << self as u16
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.notation())
    }
}

/// A set of token directions.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DirectionSet(u16);

impl DirectionSet {
    pub const EMPTY: DirectionSet = DirectionSet(0);

    #[inline]
    pub fn insert(&mut self, dir: Direction) {
        self.0 |= dir.bit();
    }

    #[inline]
    pub const fn contains(self, dir: Direction) -> bool {
        self.0 & dir.bit() != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Directions in the set, in [`Direction::ALL`] order.
    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |&d| self.contains(d))
    }
}

impl fmt::Debug for DirectionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Fence orientation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub const ALL: [Orientation; 2] = [Orientation::Horizontal, Orientation::Vertical];
}

/// One cell of the 8x8 fence grid, index `row * 8 + col`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FenceCell(u8);

impl FenceCell {
    #[inline]
    pub const fn new(row: u8, col: u8) -> FenceCell {
        debug_assert!((row as usize) < FENCE_N && (col as usize) < FENCE_N);
        FenceCell(row * FENCE_N as u8 + col)
    }

    /// Checked constructor for untrusted coordinates.
    pub fn try_new(row: usize, col: usize) -> Option<FenceCell> {
        (row < FENCE_N && col < FENCE_N).then(|| FenceCell::new(row as u8, col as u8))
    }

    #[inline]
    pub const fn from_index(index: u8) -> FenceCell {
        debug_assert!((index as usize) < FENCE_CELLS);
        FenceCell(index)
    }

    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn row(self) -> u8 {
        self.0 / FENCE_N as u8
    }

    #[inline]
    pub const fn col(self) -> u8 {
        self.0 % FENCE_N as u8
    }

    #[inline]
    const fn bit(self) -> u64 {
        1 << self.0
    }
}

/// A set of fence cells.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct FenceSet(u64);

impl FenceSet {
    pub const EMPTY: FenceSet = FenceSet(0);
    pub const ALL: FenceSet = FenceSet(u64::MAX);

    #[inline]
    pub const fn from_bits(bits: u64) -> FenceSet {
        FenceSet(bits)
    }

    #[inline]
    pub const fn bits(self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn contains(self, cell: FenceCell) -> bool {
        self.0 & cell.bit() != 0
    }

    #[inline]
    pub fn insert(&mut self, cell: FenceCell) {
        self.0 |= cell.bit();
    }

    #[inline]
    pub fn remove(&mut self, cell: FenceCell) {
        self.0 &= !cell.bit();
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Cells in ascending index order.
    pub fn iter(self) -> FenceIter {
        FenceIter(self.0)
    }
}

impl From<FenceCell> for FenceSet {
    fn from(cell: FenceCell) -> Self {
        FenceSet(cell.bit())
    }
}

impl fmt::Debug for FenceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.iter().map(|c| (c.row(), c.col())))
            .finish()
    }
}

/// Iterator over the cells of a [`FenceSet`], lowest index first.
pub struct FenceIter(u64);

impl Iterator for FenceIter {
    type Item = FenceCell;

    #[inline]
    fn next(&mut self) -> Option<FenceCell> {
        if self.0 == 0 {
            return None;
        }
        let index = self.0.trailing_zeros() as u8;
        self.0 &= self.0 - 1;
        Some(FenceCell::from_index(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

/// A move for the side to move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    Token(Direction),
    VerticalFence(FenceCell),
    HorizontalFence(FenceCell),
}

impl Move {
    #[inline]
    pub const fn fence(orientation: Orientation, cell: FenceCell) -> Move {
        match orientation {
            Orientation::Horizontal => Move::HorizontalFence(cell),
            Orientation::Vertical => Move::VerticalFence(cell),
        }
    }

    #[inline]
    pub const fn is_fence(self) -> bool {
        !matches!(self, Move::Token(_))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Token(dir) => write!(f, "P {dir}"),
            Move::HorizontalFence(cell) => write!(f, "HF {} {}", cell.row(), cell.col()),
            Move::VerticalFence(cell) => write!(f, "VF {} {}", cell.row(), cell.col()),
        }
    }
}

/// Error parsing move notation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseMoveError {
    #[error("empty move")]
    Empty,
    #[error("unknown move type '{0}' (expected P, HF or VF)")]
    UnknownKind(String),
    #[error("unknown pawn direction '{0}'")]
    UnknownDirection(String),
    #[error("invalid coordinate '{0}'")]
    BadCoordinate(String),
    #[error("fence cell ({row}, {col}) is off the fence grid")]
    OutOfRange { row: usize, col: usize },
    #[error("wrong number of arguments for '{0}'")]
    Arity(String),
}

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        let Some((&kind, args)) = parts.split_first() else {
            return Err(ParseMoveError::Empty);
        };

        match kind.to_ascii_uppercase().as_str() {
            "P" => {
                let [dir] = args else {
                    return Err(ParseMoveError::Arity(kind.to_string()));
                };
                Direction::from_notation(dir)
                    .map(Move::Token)
                    .ok_or_else(|| ParseMoveError::UnknownDirection(dir.to_string()))
            }
            k @ ("HF" | "VF") => {
                let [row, col] = args else {
                    return Err(ParseMoveError::Arity(kind.to_string()));
                };
                let row = parse_coordinate(row)?;
                let col = parse_coordinate(col)?;
                let cell =
                    FenceCell::try_new(row, col).ok_or(ParseMoveError::OutOfRange { row, col })?;
                let orientation = if k == "HF" {
                    Orientation::Horizontal
                } else {
                    Orientation::Vertical
                };
                Ok(Move::fence(orientation, cell))
            }
            _ => Err(ParseMoveError::UnknownKind(kind.to_string())),
        }
    }
}

fn parse_coordinate(s: &str) -> Result<usize, ParseMoveError> {
    s.parse()
        .map_err(|_| ParseMoveError::BadCoordinate(s.to_string()))
}

/// A move chosen by the search, with its score for the side to move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoredMove {
    pub mv: Move,
    pub score: i32,
}

impl fmt::Display for ScoredMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (score {})", self.mv, self.score)
    }
}
