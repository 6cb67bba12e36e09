//! Move engine: validated moves, turn alternation, and undo history.

use super::action::{Move, MoveError};
use super::outcome::Outcome;
use super::rules;
use super::types::{Board, CELL_COUNT, Mark};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Snapshot taken before a move was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Board before the move.
    pub board: Board,
    /// Mark that made the move.
    pub mover: Mark,
}

/// Authoritative game state.
///
/// The outcome is derived from the board on every read, so it can never
/// fall out of step with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    board: Board,
    to_move: Mark,
    history: Vec<HistoryEntry>,
}

impl GameState {
    /// Creates a new game: empty board, X to move, no history.
    #[instrument]
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            to_move: Mark::X,
            history: Vec::new(),
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the mark that moves next.
    pub fn to_move(&self) -> Mark {
        self.to_move
    }

    /// Returns the undo history, oldest first.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Returns the current outcome, computed from the board.
    pub fn outcome(&self) -> Outcome {
        rules::evaluate(&self.board)
    }

    /// Returns true if there is a move to undo.
    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    /// Indices of empty cells in ascending order.
    pub fn empty_cells(&self) -> Vec<usize> {
        self.board.empty_cells()
    }

    /// Checks whether the side to move may play at `index`.
    pub fn validate(&self, index: usize) -> Result<(), MoveError> {
        if self.outcome().is_over() {
            return Err(MoveError::GameOver);
        }
        if index >= CELL_COUNT {
            return Err(MoveError::OutOfBounds(index));
        }
        if !self.board.is_empty(index) {
            return Err(MoveError::SquareOccupied(index));
        }
        Ok(())
    }

    /// Places the side-to-move's mark at `index` and passes the turn.
    ///
    /// # Errors
    ///
    /// Returns a [`MoveError`] and leaves the state untouched if the game is
    /// over, the index is out of range, or the cell is occupied.
    #[instrument(skip(self), fields(player = %self.to_move))]
    pub fn apply_move(&mut self, index: usize) -> Result<Move, MoveError> {
        self.validate(index)?;

        let mover = self.to_move;
        let next = self
            .board
            .place(index, mover)
            .map_err(|_| MoveError::SquareOccupied(index))?;

        self.history.push(HistoryEntry {
            board: self.board,
            mover,
        });
        self.board = next;
        self.to_move = mover.opponent();

        let outcome = self.outcome();
        info!(index, mover = %mover, %outcome, "Move applied");
        Ok(Move::new(mover, index))
    }

    /// Restores the state from before the most recent move.
    ///
    /// Returns the popped entry, or `None` if there was nothing to undo.
    #[instrument(skip(self))]
    pub fn undo(&mut self) -> Option<HistoryEntry> {
        let entry = self.history.pop()?;
        self.board = entry.board;
        self.to_move = entry.mover;
        debug!(mover = %entry.mover, remaining = self.history.len(), "Move undone");
        Some(entry)
    }

    /// Clears the board and history; X moves first.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_move_alternates_turns() {
        let mut game = GameState::new();
        assert_eq!(game.apply_move(4), Ok(Move::new(Mark::X, 4)));
        assert_eq!(game.to_move(), Mark::O);
        assert_eq!(game.apply_move(0), Ok(Move::new(Mark::O, 0)));
        assert_eq!(game.to_move(), Mark::X);
        assert_eq!(game.history().len(), 2);
    }

    #[test]
    fn test_rejected_move_leaves_state_unchanged() {
        let mut game = GameState::new();
        game.apply_move(4).unwrap();
        let before = game.clone();

        assert_eq!(game.apply_move(4), Err(MoveError::SquareOccupied(4)));
        assert_eq!(game.apply_move(9), Err(MoveError::OutOfBounds(9)));
        assert_eq!(game, before);
    }

    #[test]
    fn test_no_moves_after_win() {
        let mut game = GameState::new();
        for index in [0, 3, 1, 4, 2] {
            game.apply_move(index).unwrap();
        }
        assert_eq!(game.outcome().winner(), Some(Mark::X));
        assert_eq!(game.apply_move(8), Err(MoveError::GameOver));
    }

    #[test]
    fn test_undo_restores_previous_state() {
        let mut game = GameState::new();
        game.apply_move(4).unwrap();
        let before = game.clone();

        game.apply_move(0).unwrap();
        let entry = game.undo().unwrap();

        assert_eq!(entry.mover, Mark::O);
        assert_eq!(game, before);
    }

    #[test]
    fn test_undo_on_empty_history_is_noop() {
        let mut game = GameState::new();
        assert_eq!(game.undo(), None);
        assert_eq!(game, GameState::new());
    }

    #[test]
    fn test_undo_reopens_finished_game() {
        let mut game = GameState::new();
        for index in [0, 3, 1, 4, 2] {
            game.apply_move(index).unwrap();
        }
        game.undo();
        assert_eq!(game.outcome(), Outcome::Ongoing);
        assert_eq!(game.to_move(), Mark::X);
    }

    #[test]
    fn test_reset() {
        let mut game = GameState::new();
        game.apply_move(4).unwrap();
        game.apply_move(0).unwrap();
        game.reset();
        assert_eq!(game, GameState::new());
        assert!(!game.can_undo());
    }
}
