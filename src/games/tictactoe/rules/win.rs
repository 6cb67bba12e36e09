//! Win detection logic for tic-tac-toe.

use super::super::outcome::{LINES, Line};
use super::super::types::{Board, Mark, Square};
use tracing::instrument;

/// Checks if there is a winner on the board.
///
/// Returns the mark and the first completed line in evaluation order,
/// `None` otherwise.
#[instrument(level = "trace", skip(board))]
pub fn check_winner(board: &Board) -> Option<(Mark, Line)> {
    let squares = board.squares();
    LINES.into_iter().find_map(|line @ [a, b, c]| match squares[a] {
        Square::Occupied(mark) if squares[b] == squares[a] && squares[c] == squares[a] => {
            Some((mark, line))
        }
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_winner_empty_board() {
        assert_eq!(check_winner(&Board::new()), None);
    }

    #[test]
    fn test_winner_top_row() {
        let board: Board = "XXX OO_ ___".parse().unwrap();
        assert_eq!(check_winner(&board), Some((Mark::X, [0, 1, 2])));
    }

    #[test]
    fn test_winner_column() {
        let board: Board = "XO_ XO_ _O_".parse().unwrap();
        assert_eq!(check_winner(&board), Some((Mark::O, [1, 4, 7])));
    }

    #[test]
    fn test_winner_anti_diagonal() {
        let board: Board = "XXO XO_ O__".parse().unwrap();
        assert_eq!(check_winner(&board), Some((Mark::O, [2, 4, 6])));
    }

    #[test]
    fn test_first_line_in_order_wins() {
        // Not reachable by legal play, but the report must still be stable.
        let board: Board = "XXX XXX ___".parse().unwrap();
        assert_eq!(check_winner(&board), Some((Mark::X, [0, 1, 2])));
    }

    #[test]
    fn test_no_winner_incomplete() {
        let board: Board = "XX_ ___ ___".parse().unwrap();
        assert_eq!(check_winner(&board), None);
    }
}
