//! Text game loop for humans, the engine, and a random mover.
//!
//! Each turn the board is printed and the side to move is asked for a move.
//! Engine players search with iterative deepening; the random player picks
//! uniformly among legal moves.
//!
//! ## Human commands
//!
//! - `P <dir>` - move the token (`N E S W NN EE SS WW NE NW SE SW`)
//! - `HF <row> <col>` / `VF <row> <col>` - place a fence
//! - `AI <depth>` - let the engine choose this move
//! - `help` - show the commands
//! - `quit` - stop the game
//!
//! Malformed or illegal input is reported and the prompt repeats.

use std::fmt;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use thiserror::Error;

use crate::constants::DEFAULT_AI_DEPTH;
use crate::movegen::random_legal_move;
use crate::moves::{Move, ParseMoveError};
use crate::position::{Position, Side};
use crate::search::best_move_iterative_deepening;

const HELP: &str = "\
Enter a move:
  P N      move pawn North (also E S W NN EE SS WW NE NW SE SW)
  HF 2 3   place a horizontal fence at row 2, col 3
  VF 4 5   place a vertical fence at row 4, col 5
  AI 6     let the engine choose, searching 6 moves deep
  quit     stop the game";

/// Who plays a side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerKind {
    Human,
    /// Engine searching `depth` plies with iterative deepening.
    Ai { depth: u32 },
    Random,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParsePlayerError {
    #[error("unknown player kind '{0}' (expected human, random, ai or ai:<depth>)")]
    Unknown(String),
    #[error("invalid engine depth '{0}' (expected a positive integer)")]
    BadDepth(String),
}

impl FromStr for PlayerKind {
    type Err = ParsePlayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.split_once(':') {
            Some(("ai", depth)) => parse_depth(depth).map(|depth| PlayerKind::Ai { depth }),
            None => match lower.as_str() {
                "human" | "h" => Ok(PlayerKind::Human),
                "random" | "r" => Ok(PlayerKind::Random),
                "ai" | "a" => Ok(PlayerKind::Ai {
                    depth: DEFAULT_AI_DEPTH,
                }),
                _ => Err(ParsePlayerError::Unknown(s.to_string())),
            },
            Some(_) => Err(ParsePlayerError::Unknown(s.to_string())),
        }
    }
}

fn parse_depth(s: &str) -> Result<u32, ParsePlayerError> {
    match s.parse::<u32>() {
        Ok(depth) if depth > 0 => Ok(depth),
        _ => Err(ParsePlayerError::BadDepth(s.to_string())),
    }
}

impl fmt::Display for PlayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerKind::Human => write!(f, "human"),
            PlayerKind::Ai { depth } => write!(f, "ai:{depth}"),
            PlayerKind::Random => write!(f, "random"),
        }
    }
}

/// A line typed by a human player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Play(Move),
    Ai(u32),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCommandError {
    #[error(transparent)]
    Move(#[from] ParseMoveError),
    #[error(transparent)]
    Depth(#[from] ParsePlayerError),
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut words = trimmed.split_whitespace();
        match words.next().map(str::to_ascii_lowercase).as_deref() {
            Some("quit") | Some("q") => Ok(Command::Quit),
            Some("help") | Some("?") => Ok(Command::Help),
            Some("ai") => {
                let depth = words.next().unwrap_or_default();
                Ok(Command::Ai(parse_depth(depth)?))
            }
            _ => Ok(Command::Play(trimmed.parse::<Move>()?)),
        }
    }
}

/// How a game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Won(Side),
    /// A human quit or input ran out.
    Quit,
    /// The side to move had no move at all.
    Stuck(Side),
    /// The ply limit was reached first.
    PlyLimit,
}

enum Turn {
    Move(Move),
    Quit,
    Stuck,
}

/// A game between two players over a text stream.
pub struct Game<R, W> {
    pos: Position,
    players: [PlayerKind; 2],
    input: R,
    output: W,
    rng: fastrand::Rng,
    max_plies: Option<usize>,
    plies: usize,
}

impl<R: BufRead, W: Write> Game<R, W> {
    pub fn new(players: [PlayerKind; 2], input: R, output: W) -> Self {
        Self {
            pos: Position::new(),
            players,
            input,
            output,
            rng: fastrand::Rng::new(),
            max_plies: None,
            plies: 0,
        }
    }

    /// Seed the random player.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = fastrand::Rng::with_seed(seed);
        self
    }

    /// Stop after `max_plies` moves.
    pub fn with_max_plies(mut self, max_plies: usize) -> Self {
        self.max_plies = Some(max_plies);
        self
    }

    pub fn position(&self) -> &Position {
        &self.pos
    }

    pub fn plies(&self) -> usize {
        self.plies
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Play until someone wins, a human quits, or the ply limit is hit.
    pub fn run(&mut self) -> io::Result<Outcome> {
        log::info!(
            "new game: {} vs {}",
            self.players[Side::One.index()],
            self.players[Side::Two.index()]
        );

        loop {
            writeln!(self.output, "\n{}\n", self.pos)?;

            if let Some(winner) = self.pos.winner() {
                writeln!(self.output, "{winner} wins!")?;
                log::info!("{winner} wins after {} plies", self.plies);
                return Ok(Outcome::Won(winner));
            }
            if self.max_plies.is_some_and(|max| self.plies >= max) {
                writeln!(self.output, "Ply limit reached.")?;
                return Ok(Outcome::PlyLimit);
            }

            let side = self.pos.side_to_move();
            let mv = match self.next_move(side)? {
                Turn::Move(mv) => mv,
                Turn::Quit => return Ok(Outcome::Quit),
                Turn::Stuck => {
                    writeln!(self.output, "{side} has no legal move.")?;
                    return Ok(Outcome::Stuck(side));
                }
            };

            self.pos.make_move(mv);
            self.plies += 1;
            writeln!(self.output, "{side} plays {mv}")?;
            log::info!("ply {}: {side} plays {mv}", self.plies);
        }
    }

    fn next_move(&mut self, side: Side) -> io::Result<Turn> {
        match self.players[side.index()] {
            PlayerKind::Human => self.read_human_move(side),
            PlayerKind::Ai { depth } => self.engine_move(depth),
            PlayerKind::Random => Ok(random_legal_move(&self.pos, &mut self.rng)
                .map_or(Turn::Stuck, Turn::Move)),
        }
    }

    fn engine_move(&mut self, depth: u32) -> io::Result<Turn> {
        write!(self.output, "AI is thinking... ")?;
        self.output.flush()?;
        Ok(match best_move_iterative_deepening(&self.pos, depth) {
            Some(best) => {
                writeln!(self.output, "AI chose {best}")?;
                Turn::Move(best.mv)
            }
            None => Turn::Stuck,
        })
    }

    fn read_human_move(&mut self, side: Side) -> io::Result<Turn> {
        loop {
            write!(self.output, "{side} ({})> ", side.symbol())?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(Turn::Quit);
            }
            if line.trim().is_empty() {
                continue;
            }

            match line.parse::<Command>() {
                Ok(Command::Quit) => return Ok(Turn::Quit),
                Ok(Command::Help) => writeln!(self.output, "{HELP}")?,
                Ok(Command::Ai(depth)) => match self.engine_move(depth)? {
                    Turn::Stuck => writeln!(self.output, "The engine found no move.")?,
                    turn => return Ok(turn),
                },
                Ok(Command::Play(mv)) => match self.pos.validate(mv) {
                    Ok(()) => return Ok(Turn::Move(mv)),
                    Err(e) => writeln!(self.output, "{e}. Try again.")?,
                },
                Err(e) => writeln!(self.output, "{e}. Type 'help' for commands.")?,
            }
        }
    }
}
