//! Exhaustive minimax over the remaining game tree.
//!
//! Scores are from the AI's point of view: +10 for an AI win, -10 for an
//! opponent win, 0 for a draw. There is no depth discount, so a slow win
//! scores the same as a fast one. Ties go to the lowest cell index.

use super::{Strategy, StrategyError, ensure_playable};
use crate::games::tictactoe::{Board, Mark, Outcome, rules};
use std::collections::HashMap;
use tracing::{debug, instrument};

const WIN_SCORE: i32 = 10;
const LOSS_SCORE: i32 = -10;
const DRAW_SCORE: i32 = 0;

/// Scores already computed during one search, keyed by position and side.
type Table = HashMap<(Board, bool), i32>;

/// Terminal score of `outcome` for `ai`, or `None` while ongoing.
fn terminal_score(outcome: Outcome, ai: Mark) -> Option<i32> {
    match outcome {
        Outcome::Ongoing => None,
        Outcome::Draw => Some(DRAW_SCORE),
        Outcome::Win { mark, .. } if mark == ai => Some(WIN_SCORE),
        Outcome::Win { .. } => Some(LOSS_SCORE),
    }
}

fn search(board: &Board, ai: Mark, maximizing: bool, table: &mut Table) -> i32 {
    if let Some(score) = terminal_score(rules::evaluate(board), ai) {
        return score;
    }
    if let Some(score) = table.get(&(*board, maximizing)) {
        return *score;
    }

    let mover = if maximizing { ai } else { ai.opponent() };
    let mut best: Option<i32> = None;
    for index in board.empty_cells() {
        let Ok(next) = board.place(index, mover) else {
            continue;
        };
        let score = search(&next, ai, !maximizing, table);
        best = match best {
            Some(b) if (maximizing && score <= b) || (!maximizing && score >= b) => Some(b),
            _ => Some(score),
        };
    }

    // An ongoing board always has an empty cell.
    let score = best.unwrap_or(DRAW_SCORE);
    table.insert((*board, maximizing), score);
    score
}

/// Minimax value of `board` for `ai`, with `maximizing` telling whether
/// `ai` is the side to move.
#[instrument(skip(board))]
pub fn minimax_score(board: &Board, ai: Mark, maximizing: bool) -> i32 {
    search(board, ai, maximizing, &mut Table::new())
}

/// Best cell for `ai` to play; the first index reaching the maximum wins
/// ties.
#[instrument(skip(board), fields(%ai))]
pub(super) fn best_move(board: &Board, ai: Mark) -> Result<usize, StrategyError> {
    ensure_playable(board)?;

    let mut table = Table::new();
    let mut best: Option<(usize, i32)> = None;
    for index in board.empty_cells() {
        let Ok(next) = board.place(index, ai) else {
            continue;
        };
        let score = search(&next, ai, false, &mut table);
        if best.is_none_or(|(_, b)| score > b) {
            best = Some((index, score));
        }
    }

    let (index, score) = best.ok_or(StrategyError::NoLegalMoves)?;
    debug!(index, score, explored = table.len(), "Optimal move chosen");
    Ok(index)
}

/// AI that never loses.
pub struct OptimalStrategy {
    name: String,
}

impl OptimalStrategy {
    /// Creates an optimal strategy.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Strategy for OptimalStrategy {
    fn choose(&mut self, board: &Board, mark: Mark) -> Result<usize, StrategyError> {
        best_move(board, mark)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
