//! Tic-tac-toe driver
//!
//! Headless simulations and a line-based terminal game on top of the engine.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command, Policy};
use tictactoe_engine::{
    Arena, Difficulty, FirstAvailableStrategy, Mode, OptimalStrategy, Position, RandomStrategy,
    SessionConfig, SessionController, SessionSnapshot, Strategy,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => SessionConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SessionConfig::new(),
    };

    match cli.command {
        Command::Simulate {
            x,
            o,
            games,
            seed,
            json,
        } => run_simulation(x, o, games, seed.or(*config.rng_seed()), json),
        Command::Play { difficulty } => {
            let config = match difficulty {
                Some(d) => config.with_difficulty(d),
                None => config,
            };
            run_play(config).await
        }
    }
}

fn build_strategy(policy: Policy, name: &str, seed: Option<u64>) -> Box<dyn Strategy> {
    match policy {
        Policy::Random => match seed {
            Some(seed) => Box::new(RandomStrategy::seeded(name, seed)),
            None => Box::new(RandomStrategy::new(name)),
        },
        Policy::Optimal => Box::new(OptimalStrategy::new(name)),
        Policy::First => Box::new(FirstAvailableStrategy::new(name)),
    }
}

/// Run a headless series and print the tally
#[instrument]
fn run_simulation(x: Policy, o: Policy, games: u32, seed: Option<u64>, json: bool) -> Result<()> {
    info!("Starting simulation");

    // Distinct streams so two random players don't mirror each other.
    let mut arena = Arena::new(
        build_strategy(x, "X", seed),
        build_strategy(o, "O", seed.map(|s| s.wrapping_add(1))),
    );
    let tally = arena.play_series(games)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tally)?);
    } else {
        println!("X ({:?}) wins: {}", x, tally.x_wins);
        println!("O ({:?}) wins: {}", o, tally.o_wins);
        println!("Draws:        {}", tally.draws);
    }
    Ok(())
}

fn render(snapshot: &SessionSnapshot) {
    println!("\n{}\n", snapshot.board().display());
    println!("{}", snapshot.status_text());
}

/// Run an interactive game against the AI on stdin/stdout
async fn run_play(config: SessionConfig) -> Result<()> {
    let session = SessionController::new(config)?;
    session.set_mode(Mode::PlayerVsAi);

    println!("You are X. Enter a cell (1-9 or a name like \"center\"),");
    println!("'u' to undo, 'r' to restart, 'e'/'h' for easy/hard, 'q' to quit.");
    render(&session.state());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "q" | "quit" => break,
            "u" | "undo" => {
                if !session.request_undo() {
                    println!("Nothing to undo.");
                }
            }
            "r" | "restart" => session.request_reset(false),
            "e" | "easy" => session.set_difficulty(Difficulty::Random),
            "h" | "hard" => session.set_difficulty(Difficulty::Optimal),
            input => match Position::from_label_or_number(input) {
                Some(pos) => {
                    if let Err(e) = session.request_move(pos.to_index()) {
                        println!("{}", e);
                    }
                }
                None => println!("Unrecognized input: {}", input),
            },
        }

        if *session.state().ai_busy() {
            println!("AI is thinking...");
        }
        session.wait_for_ai().await;
        render(&session.state());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_default_filter_shows_info() {
        let filter = EnvFilter::new(DEFAULT_LOG_FILTER);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
    }
}
