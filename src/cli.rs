//! Command-line interface for the flux binary.

use clap::{Parser, Subcommand, ValueEnum};
use flux::{Color, Difficulty};

/// Flux - rules engine and AI for the Flux board game
#[derive(Parser, Debug)]
#[command(name = "flux")]
#[command(about = "Play Flux against the AI or watch the AI play itself", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Let two AI engines play each other
    Selfplay {
        /// White difficulty (1-4 or easy|medium|hard|expert)
        #[arg(long, default_value = "hard")]
        white: Difficulty,

        /// Black difficulty
        #[arg(long, default_value = "hard")]
        black: Difficulty,

        /// Seed for reproducible games; black uses seed + 1
        #[arg(long)]
        seed: Option<u64>,

        /// Expert search budget per move
        #[arg(long, default_value_t = 3000)]
        time_limit_ms: u64,

        /// Stop after this many plies even if the game is not over
        #[arg(long, default_value_t = 200)]
        max_plies: u32,

        /// Print the move log and final state as JSON
        #[arg(long)]
        json: bool,
    },

    /// Play against the AI in the terminal
    Play {
        /// AI difficulty (1-4 or easy|medium|hard|expert)
        #[arg(short, long, default_value = "medium")]
        difficulty: Difficulty,

        /// Color you play
        #[arg(short, long, value_enum, default_value_t = Side::White)]
        color: Side,

        /// Seed for the AI's random choices
        #[arg(long)]
        seed: Option<u64>,

        /// Expert search budget per move
        #[arg(long, default_value_t = 3000)]
        time_limit_ms: u64,
    },
}

/// Seat choice on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Side {
    White,
    Black,
}

impl From<Side> for Color {
    fn from(side: Side) -> Self {
        match side {
            Side::White => Color::White,
            Side::Black => Color::Black,
        }
    }
}
