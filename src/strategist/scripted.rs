//! Deterministic scripted opponent.

use super::{Strategy, StrategyError, ensure_playable};
use crate::games::tictactoe::{Board, Mark};
use tracing::debug;

/// Plays the first empty cell in index order.
///
/// Not offered as a difficulty; used as a fixed sparring partner.
pub struct FirstAvailableStrategy {
    name: String,
}

impl FirstAvailableStrategy {
    /// Creates a first-available strategy.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Strategy for FirstAvailableStrategy {
    fn choose(&mut self, board: &Board, _mark: Mark) -> Result<usize, StrategyError> {
        ensure_playable(board)?;
        let index = board
            .empty_cells()
            .first()
            .copied()
            .ok_or(StrategyError::NoLegalMoves)?;
        debug!(ai = %self.name, index, "Scripted move chosen");
        Ok(index)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
