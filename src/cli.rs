//! Command-line interface for the tictactoe driver.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tictactoe_engine::Difficulty;

/// Tic-tac-toe - headless simulations and a terminal game against the AI
#[derive(Parser, Debug)]
#[command(name = "tictactoe")]
#[command(about = "Tic-tac-toe engine driver", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a session config (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Policies available to the simulator.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Policy {
    /// Uniformly random legal move
    Random,
    /// Exhaustive minimax
    Optimal,
    /// First empty cell in index order
    First,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a series of headless games and print the tally
    Simulate {
        /// Policy for X
        #[arg(long, value_enum, default_value = "random")]
        x: Policy,

        /// Policy for O
        #[arg(long, value_enum, default_value = "optimal")]
        o: Policy,

        /// Number of games
        #[arg(short, long, default_value = "100")]
        games: u32,

        /// Seed for random policies
        #[arg(long)]
        seed: Option<u64>,

        /// Print the tally as JSON
        #[arg(long)]
        json: bool,
    },

    /// Play X against the AI in the terminal
    Play {
        /// AI difficulty (random/easy or optimal/hard); overrides the config
        #[arg(short, long)]
        difficulty: Option<Difficulty>,
    },
}
