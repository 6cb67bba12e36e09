//! AI move selection.
//!
//! Two policies are available: [`RandomStrategy`] picks uniformly among the
//! empty cells, [`OptimalStrategy`] searches the full game tree and never
//! loses.

mod optimal;
mod random;
mod scripted;

pub use optimal::{OptimalStrategy, minimax_score};
pub use random::RandomStrategy;
pub use scripted::FirstAvailableStrategy;

use crate::games::tictactoe::{Board, Mark, rules};
use derive_more::{Display, Error};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Which policy the AI uses.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Difficulty {
    /// Uniformly random legal move.
    #[strum(to_string = "random", serialize = "easy")]
    Random,
    /// Exhaustive adversarial search.
    #[default]
    #[strum(to_string = "optimal", serialize = "hard")]
    Optimal,
}

/// The AI was asked to move on a board where no move is possible.
///
/// This is a caller defect: the session controller only asks for a move
/// while the game is ongoing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum StrategyError {
    /// Every cell is occupied.
    #[display("No legal moves available")]
    NoLegalMoves,
    /// The board already has a winner.
    #[display("Game is already over")]
    GameAlreadyOver,
}

/// Something that picks a cell for `mark` to play.
pub trait Strategy: Send {
    /// Chooses a cell index for `mark` on `board`.
    ///
    /// # Errors
    ///
    /// Returns a [`StrategyError`] if the board is full or decided.
    fn choose(&mut self, board: &Board, mark: Mark) -> Result<usize, StrategyError>;

    /// Returns the strategy's display name.
    fn name(&self) -> &str;
}

/// Checks that a move can be chosen on `board`.
pub(crate) fn ensure_playable(board: &Board) -> Result<(), StrategyError> {
    if rules::check_winner(board).is_some() {
        return Err(StrategyError::GameAlreadyOver);
    }
    if rules::is_full(board) {
        return Err(StrategyError::NoLegalMoves);
    }
    Ok(())
}

/// Chooses a move for `mark` under `difficulty`.
///
/// `rng` is only consulted by the random policy.
#[instrument(skip(board, rng), fields(%mark, %difficulty))]
pub fn choose_move<R: Rng + ?Sized>(
    board: &Board,
    mark: Mark,
    difficulty: Difficulty,
    rng: &mut R,
) -> Result<usize, StrategyError> {
    match difficulty {
        Difficulty::Random => random::pick(board, rng),
        Difficulty::Optimal => optimal::best_move(board, mark),
    }
}
