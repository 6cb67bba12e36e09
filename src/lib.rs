//! Tic-tac-toe engine - board rules, undo history, and an unbeatable AI
//!
//! The crate is the game core behind a tic-tac-toe front end. Rendering is
//! left to the caller, which talks to a [`SessionController`].
//!
//! # Architecture
//!
//! - **Board**: nine cells, empty-cell enumeration, non-mutating placement
//! - **Rules**: win/draw/ongoing evaluation as a pure function of the board
//! - **Engine**: validated moves, turn alternation, undo history
//! - **Strategist**: random and optimal (minimax) move selection
//! - **Session**: mode, difficulty, and the asynchronous AI turn
//! - **Arena**: headless games between two strategies
//!
//! # Example
//!
//! ```no_run
//! use tictactoe_engine::{Mode, SessionConfig, SessionController};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let session = SessionController::new(SessionConfig::instant())?;
//! session.set_mode(Mode::PlayerVsAi);
//! session.request_move(4)?;
//! session.wait_for_ai().await;
//! println!("{}", session.state().board().display());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod arena;
mod config;
mod games;
mod session;
mod strategist;

// Crate-level exports - Headless play
pub use arena::{Arena, GameRecord, Tally};

// Crate-level exports - Configuration
pub use config::{ConfigError, SessionConfig};

// Crate-level exports - Session management
pub use session::{AI_MARK, Mode, SessionController, SessionError, SessionSnapshot};

// Crate-level exports - AI strategies
pub use strategist::{
    Difficulty, FirstAvailableStrategy, OptimalStrategy, RandomStrategy, Strategy,
    StrategyError, choose_move, minimax_score,
};

// Crate-level exports - Game types
pub use games::tictactoe::{
    Board, BoardError, BoardParseError, CELL_COUNT, GameState, HistoryEntry, LINES, Line, Mark,
    Move, MoveError, Outcome, Position, Square,
};

/// Outcome evaluation functions.
pub mod rules {
    pub use crate::games::tictactoe::rules::{check_winner, evaluate, is_full};
}
