//! Quoridor engine command line.
//!
//! ## Usage
//!
//! - `quoridor` - Play a human against the engine
//! - `quoridor play --p1 ai:3 --p2 random` - Pick the players
//! - `quoridor analyze --depth 5 --moves "P N, HF 2 3"` - Search a position
//! - `quoridor selfplay --depth 3` - Let the engine play itself

use std::io;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use quoridor_engine::constants::DEFAULT_AI_DEPTH;
use quoridor_engine::game::{Game, Outcome, PlayerKind};
use quoridor_engine::moves::Move;
use quoridor_engine::position::Position;
use quoridor_engine::search::{Searcher, format_line};

/// Quoridor: a bitboard engine with principal variation search
#[derive(Parser)]
#[command(name = "quoridor")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log every search iteration
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game on the terminal
    Play {
        /// Player one: human, random, ai or ai:<depth>
        #[arg(long, default_value = "human")]
        p1: PlayerKind,
        /// Player two: human, random, ai or ai:<depth>
        #[arg(long, default_value = "ai")]
        p2: PlayerKind,
        /// Seed for random players
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Search the initial position, or the one reached by `--moves`
    Analyze {
        /// Moves to play first, comma separated (e.g. "P N, HF 2 3")
        #[arg(long, default_value = "")]
        moves: String,
        #[arg(long, default_value_t = DEFAULT_AI_DEPTH, value_parser = clap::value_parser!(u32).range(1..))]
        depth: u32,
        /// Search only the final depth instead of deepening iteratively
        #[arg(long)]
        fixed: bool,
    },
    /// Let the engine play both sides
    Selfplay {
        #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u32).range(1..))]
        depth: u32,
        #[arg(long, default_value_t = 200)]
        max_plies: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    match cli.command {
        Some(Commands::Play { p1, p2, seed }) => play([p1, p2], seed),
        Some(Commands::Analyze {
            moves,
            depth,
            fixed,
        }) => analyze(&moves, depth, fixed),
        Some(Commands::Selfplay { depth, max_plies }) => selfplay(depth, max_plies),
        None => play(
            [
                PlayerKind::Human,
                PlayerKind::Ai {
                    depth: DEFAULT_AI_DEPTH,
                },
            ],
            None,
        ),
    }
}

fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, level),
    )
    .format_timestamp(None)
    .init();
}

fn play(players: [PlayerKind; 2], seed: Option<u64>) -> Result<()> {
    println!("Quoridor: {} vs {}", players[0], players[1]);
    println!("Type 'help' for the move syntax.");

    let stdin = io::stdin();
    let mut game = Game::new(players, stdin.lock(), io::stdout());
    if let Some(seed) = seed {
        game = game.with_seed(seed);
    }
    game.run().context("game I/O failed")?;
    Ok(())
}

fn analyze(moves: &str, depth: u32, fixed: bool) -> Result<()> {
    let mut pos = Position::new();
    let moves = moves.split(',').map(str::trim).filter(|s| !s.is_empty());
    for (n, text) in moves.enumerate() {
        let mv = text
            .parse::<Move>()
            .with_context(|| format!("move {}: cannot parse '{text}'", n + 1))?;
        pos.play(mv)
            .with_context(|| format!("move {}: cannot play '{mv}'", n + 1))?;
    }

    println!("{pos}\n");
    if let Some(winner) = pos.winner() {
        println!("{winner} has already won.");
        return Ok(());
    }

    let mut searcher = Searcher::new(&pos);
    let result = if fixed {
        searcher.search(depth, &[])
    } else {
        searcher.iterate(depth)
    };

    let Some(best) = result.best else {
        bail!("no move found for {}", pos.side_to_move());
    };
    println!("best {best}");
    println!("pv {}", format_line(&result.line));
    println!("nodes {}", result.nodes);
    Ok(())
}

fn selfplay(depth: u32, max_plies: usize) -> Result<()> {
    let engine = PlayerKind::Ai { depth };
    let mut game = Game::new([engine, engine], io::empty(), io::stdout()).with_max_plies(max_plies);
    let outcome = game.run().context("game I/O failed")?;

    match outcome {
        Outcome::Won(side) => println!("{side} won in {} plies", game.plies()),
        Outcome::PlyLimit => println!("No winner after {max_plies} plies"),
        Outcome::Stuck(side) => println!("{side} had no move"),
        Outcome::Quit => {}
    }
    Ok(())
}
