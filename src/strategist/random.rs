//! Uniform random policy.

use super::{Strategy, StrategyError, ensure_playable};
use crate::games::tictactoe::{Board, Mark};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Picks a uniformly random empty cell.
pub(super) fn pick<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Result<usize, StrategyError> {
    ensure_playable(board)?;
    let cells = board.empty_cells();
    let index = *cells.choose(rng).ok_or(StrategyError::NoLegalMoves)?;
    debug!(index, candidates = cells.len(), "Random move chosen");
    Ok(index)
}

/// AI that plays a uniformly random legal move.
pub struct RandomStrategy {
    name: String,
    rng: StdRng,
}

impl RandomStrategy {
    /// Creates a random strategy seeded from the OS.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a reproducible random strategy.
    pub fn seeded(name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Strategy for RandomStrategy {
    fn choose(&mut self, board: &Board, _mark: Mark) -> Result<usize, StrategyError> {
        pick(board, &mut self.rng)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_picks_only_empty_cells() {
        let board: Board = "XOX O_O X_X".parse().unwrap();
        let mut ai = RandomStrategy::seeded("rand", 7);
        for _ in 0..50 {
            let index = ai.choose(&board, Mark::O).unwrap();
            assert!(index == 4 || index == 7);
        }
    }

    #[test]
    fn test_random_covers_all_candidates() {
        let board = Board::new();
        let mut ai = RandomStrategy::seeded("rand", 42);
        let mut seen = [false; 9];
        for _ in 0..500 {
            seen[ai.choose(&board, Mark::X).unwrap()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_same_seed_same_choices() {
        let board = Board::new();
        let mut a = RandomStrategy::seeded("a", 3);
        let mut b = RandomStrategy::seeded("b", 3);
        for _ in 0..20 {
            assert_eq!(a.choose(&board, Mark::X), b.choose(&board, Mark::X));
        }
    }
}
