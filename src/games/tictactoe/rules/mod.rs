//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`]. Nothing here mutates state, so the
//! same board always yields the same result.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::check_winner;

use super::outcome::Outcome;
use super::types::Board;
use tracing::instrument;

/// Classifies a board as won, drawn, or ongoing.
///
/// Lines are checked in [`super::outcome::LINES`] order and the first
/// completed one is reported.
#[instrument(level = "trace", skip(board))]
pub fn evaluate(board: &Board) -> Outcome {
    if let Some((mark, line)) = check_winner(board) {
        return Outcome::Win { mark, line };
    }
    if is_full(board) {
        return Outcome::Draw;
    }
    Outcome::Ongoing
}
