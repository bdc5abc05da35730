//! A Quoridor engine built on padded bitboards.
//!
//! Two players race their tokens to the opposite side of a 9x9 board while
//! placing two-cell fences to slow each other down. The engine searches with
//! negamax principal variation search and iterative deepening, scoring leaves
//! by the difference in shortest-path lengths.
//!
//! ## Modules
//!
//! - [`constants`] - Board dimensions, setup and score constants
//! - [`bitboard`] - Padded 11x11 bitboards and fence blocker masks
//! - [`moves`] - Directions, fence cells, fence sets and move notation
//! - [`position`] - Game state with reversible make/unmake
//! - [`path`] - Bidirectional shortest-path search and the evaluation
//! - [`movegen`] - Token jumps and fence legality
//! - [`search`] - Principal variation search with iterative deepening
//! - [`game`] - Text game loop for humans, the engine and random play
//!
//! ## Example
//!
//! ```
//! use quoridor_engine::moves::Move;
//! use quoridor_engine::position::Position;
//! use quoridor_engine::search::best_move_iterative_deepening;
//!
//! let mut pos = Position::new();
//! pos.play("P N".parse::<Move>().unwrap()).unwrap();
//!
//! let best = best_move_iterative_deepening(&pos, 2).unwrap();
//! println!("Best reply: {best}");
//! ```

pub mod bitboard;
pub mod constants;
pub mod game;
pub mod movegen;
pub mod moves;
pub mod path;
pub mod position;
pub mod search;
