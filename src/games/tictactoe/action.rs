//! First-class action types for tic-tac-toe.
//!
//! Moves are domain events, not side effects. They represent
//! the player's intent and can be validated independently of execution.

use super::types::Mark;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

/// A move in tic-tac-toe: a mark placed at a cell index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_new::new)]
pub struct Move {
    /// The mark being placed.
    pub mark: Mark,
    /// The target cell (0-8).
    pub index: usize,
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.mark, self.index)
    }
}

/// Why a move request was rejected.
///
/// Every variant is an expected interaction (a click on a taken cell, a
/// click while the AI is thinking); the state is left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum MoveError {
    /// The index is outside 0-8.
    #[display("Position {} is out of bounds (must be 0-8)", _0)]
    OutOfBounds(#[error(not(source))] usize),

    /// The square at the index is already occupied.
    #[display("Square {} is already occupied", _0)]
    SquareOccupied(#[error(not(source))] usize),

    /// The game is already over.
    #[display("Game is already over")]
    GameOver,

    /// It's not this mark's turn through this entry point.
    #[display("It's not {}'s turn", _0)]
    WrongPlayer(#[error(not(source))] Mark),

    /// The AI is mid-turn; no other mutation is accepted.
    #[display("AI is thinking")]
    AiBusy,

    /// No game is active (the session is at the menu).
    #[display("No active game")]
    NoActiveGame,
}
