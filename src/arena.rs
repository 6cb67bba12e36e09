//! Headless games between two strategies.

use crate::games::tictactoe::{GameState, Mark, Move, Outcome};
use crate::strategist::{Strategy, StrategyError};
use serde::Serialize;
use tracing::{debug, info, instrument};

/// A finished headless game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameRecord {
    /// Moves in the order played.
    pub moves: Vec<Move>,
    /// Final outcome (never `Ongoing`).
    pub outcome: Outcome,
}

/// Win/draw counts over a series of games.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    /// Games won by X.
    pub x_wins: u32,
    /// Games won by O.
    pub o_wins: u32,
    /// Drawn games.
    pub draws: u32,
}

impl Tally {
    /// Adds one finished game.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome.winner() {
            Some(Mark::X) => self.x_wins += 1,
            Some(Mark::O) => self.o_wins += 1,
            None => self.draws += 1,
        }
    }

    /// Total games counted.
    pub fn total(&self) -> u32 {
        self.x_wins + self.o_wins + self.draws
    }
}

/// Plays games between two strategies on a fresh engine.
pub struct Arena {
    player_x: Box<dyn Strategy>,
    player_o: Box<dyn Strategy>,
}

impl Arena {
    /// Creates an arena; `player_x` moves first.
    pub fn new(player_x: Box<dyn Strategy>, player_o: Box<dyn Strategy>) -> Self {
        Self { player_x, player_o }
    }

    /// Plays one game to completion.
    ///
    /// # Errors
    ///
    /// Propagates a [`StrategyError`] from either player.
    #[instrument(skip(self), fields(x = %self.player_x.name(), o = %self.player_o.name()))]
    pub fn play(&mut self) -> Result<GameRecord, StrategyError> {
        let mut game = GameState::new();
        let mut moves = Vec::new();

        while !game.outcome().is_over() {
            let mark = game.to_move();
            let player = match mark {
                Mark::X => &mut self.player_x,
                Mark::O => &mut self.player_o,
            };
            let index = player.choose(game.board(), mark)?;
            // A strategy only returns empty cells of an ongoing board.
            let mv = game
                .apply_move(index)
                .map_err(|_| StrategyError::NoLegalMoves)?;
            debug!(player = %player.name(), %mv, "Arena move");
            moves.push(mv);
        }

        let outcome = game.outcome();
        info!(%outcome, moves = moves.len(), "Arena game finished");
        Ok(GameRecord { moves, outcome })
    }

    /// Plays `games` games and counts the results.
    #[instrument(skip(self))]
    pub fn play_series(&mut self, games: u32) -> Result<Tally, StrategyError> {
        let mut tally = Tally::default();
        for _ in 0..games {
            tally.record(self.play()?.outcome);
        }
        Ok(tally)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategist::{FirstAvailableStrategy, OptimalStrategy};

    #[test]
    fn test_optimal_self_play_draws() {
        let mut arena = Arena::new(
            Box::new(OptimalStrategy::new("x")),
            Box::new(OptimalStrategy::new("o")),
        );
        let record = arena.play().unwrap();
        assert_eq!(record.outcome, Outcome::Draw);
        assert_eq!(record.moves.len(), 9);
    }

    #[test]
    fn test_first_available_loses_as_x_to_optimal() {
        let mut arena = Arena::new(
            Box::new(FirstAvailableStrategy::new("x")),
            Box::new(OptimalStrategy::new("o")),
        );
        let record = arena.play().unwrap();
        assert_eq!(record.outcome.winner(), Some(Mark::O));
    }

    #[test]
    fn test_tally_counts() {
        let mut tally = Tally::default();
        tally.record(Outcome::Draw);
        tally.record(Outcome::Win {
            mark: Mark::O,
            line: [0, 4, 8],
        });
        assert_eq!(tally.draws, 1);
        assert_eq!(tally.o_wins, 1);
        assert_eq!(tally.total(), 2);
    }
}
