//! Core domain types for tic-tac-toe.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::instrument;

/// Number of cells on the board.
pub const CELL_COUNT: usize = 9;

/// A player's mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Mark {
    /// Mark X (moves first).
    X,
    /// Mark O (moves second; the AI's mark in player-vs-AI games).
    O,
}

impl Mark {
    /// Returns the opposing mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// A cell on the tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Square {
    /// Unoccupied cell.
    #[default]
    Empty,
    /// Cell holding a mark.
    Occupied(Mark),
}

impl Square {
    /// Returns the mark in this cell, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Square::Empty => None,
            Square::Occupied(mark) => Some(mark),
        }
    }
}

/// Error raised when a placement violates the board's preconditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum BoardError {
    /// Index outside 0-8 or cell already occupied.
    #[display("Invalid move at index {}", _0)]
    InvalidMove(#[error(not(source))] usize),
}

/// Error raised when parsing a board pattern.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Invalid board pattern: {}", message)]
pub struct BoardParseError {
    /// What was wrong with the pattern.
    pub message: String,
}

/// 3x3 tic-tac-toe board.
///
/// Boards are values: [`Board::place`] returns a new board rather than
/// mutating in place, so snapshots can be stored in history freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Board {
    /// Squares in row-major order (0-8).
    squares: [Square; CELL_COUNT],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            squares: [Square::Empty; CELL_COUNT],
        }
    }

    /// Builds a board from explicit squares.
    pub fn from_squares(squares: [Square; CELL_COUNT]) -> Self {
        Self { squares }
    }

    /// Gets the square at the given index (0-8).
    pub fn get(&self, index: usize) -> Option<Square> {
        self.squares.get(index).copied()
    }

    /// Checks if a square is empty. Out-of-range indices are never empty.
    pub fn is_empty(&self, index: usize) -> bool {
        matches!(self.get(index), Some(Square::Empty))
    }

    /// Returns all squares as a slice.
    pub fn squares(&self) -> &[Square; CELL_COUNT] {
        &self.squares
    }

    /// Indices of empty cells in ascending order.
    ///
    /// Downstream tie-breaking (the optimal strategy) relies on this order.
    pub fn empty_cells(&self) -> Vec<usize> {
        (0..CELL_COUNT).filter(|&i| self.is_empty(i)).collect()
    }

    /// Number of cells holding `mark`.
    pub fn count(&self, mark: Mark) -> usize {
        self.squares
            .iter()
            .filter(|s| **s == Square::Occupied(mark))
            .count()
    }

    /// Returns a copy of this board with `mark` placed at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidMove`] if `index` is outside 0-8 or the
    /// cell is already occupied. Callers are expected to validate first.
    #[instrument(level = "trace", skip(self))]
    pub fn place(&self, index: usize, mark: Mark) -> Result<Board, BoardError> {
        if !self.is_empty(index) {
            return Err(BoardError::InvalidMove(index));
        }
        let mut next = *self;
        next.squares[index] = Square::Occupied(mark);
        Ok(next)
    }

    /// Formats the board as a human-readable grid.
    ///
    /// Empty cells show their 1-based number.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let pos = row * 3 + col;
                let symbol = match self.squares[pos] {
                    Square::Empty => (pos + 1).to_string(),
                    Square::Occupied(mark) => mark.to_string(),
                };
                result.push_str(&symbol);
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

impl FromStr for Board {
    type Err = BoardParseError;

    /// Parses a 9-cell pattern such as `"XO_ O__ ___"`.
    ///
    /// `X`/`O` (either case) are marks; `_`, `.` and `-` are empty cells.
    /// Whitespace and `,`/`|` separators are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut squares = Vec::with_capacity(CELL_COUNT);
        for ch in s.chars() {
            let square = match ch {
                'X' | 'x' => Square::Occupied(Mark::X),
                'O' | 'o' => Square::Occupied(Mark::O),
                '_' | '.' | '-' => Square::Empty,
                c if c.is_whitespace() || c == ',' || c == '|' => continue,
                other => {
                    return Err(BoardParseError {
                        message: format!("unexpected character {:?}", other),
                    });
                }
            };
            squares.push(square);
        }

        let squares: [Square; CELL_COUNT] =
            squares.try_into().map_err(|v: Vec<Square>| BoardParseError {
                message: format!("expected {} cells, found {}", CELL_COUNT, v.len()),
            })?;
        Ok(Self { squares })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        assert_eq!(board.empty_cells(), (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn test_place_returns_new_board() {
        let board = Board::new();
        let next = board.place(4, Mark::X).unwrap();
        assert!(board.is_empty(4));
        assert_eq!(next.get(4), Some(Square::Occupied(Mark::X)));
        assert_eq!(next.empty_cells(), vec![0, 1, 2, 3, 5, 6, 7, 8]);
    }

    #[test]
    fn test_place_rejects_occupied_and_out_of_range() {
        let board = Board::new().place(0, Mark::X).unwrap();
        assert_eq!(board.place(0, Mark::O), Err(BoardError::InvalidMove(0)));
        assert_eq!(board.place(9, Mark::O), Err(BoardError::InvalidMove(9)));
    }

    #[test]
    fn test_parse_pattern() {
        let board: Board = "XO_ O__ ___".parse().unwrap();
        assert_eq!(board.get(0), Some(Square::Occupied(Mark::X)));
        assert_eq!(board.get(1), Some(Square::Occupied(Mark::O)));
        assert_eq!(board.get(3), Some(Square::Occupied(Mark::O)));
        assert_eq!(board.count(Mark::X), 1);
        assert_eq!(board.count(Mark::O), 2);
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert!("XO".parse::<Board>().is_err());
        assert!("XOZ______".parse::<Board>().is_err());
    }

    #[test]
    fn test_display_grid() {
        let board: Board = "X________".parse().unwrap();
        assert_eq!(board.display(), "X|2|3\n-+-+-\n4|5|6\n-+-+-\n7|8|9");
    }
}
