//! Session controller: mode, difficulty, and the AI's turn.
//!
//! The controller owns the authoritative [`GameState`] behind a mutex and is
//! cheap to clone. When it becomes the AI's turn in a player-vs-AI game, a
//! single background task is spawned on the tokio runtime. While that task is
//! in flight the session reports `ai_busy` and rejects every mutation except
//! reset and mode change, which cancel it.
//!
//! The search itself runs on the blocking pool without the lock held; its
//! result is applied only if the turn is still current.

use crate::config::SessionConfig;
use crate::games::tictactoe::{Board, CELL_COUNT, GameState, Mark, Move, MoveError, Outcome};
use crate::strategist::{self, Difficulty, StrategyError};
use derive_getters::Getters;
use derive_more::{Display, Error};
use rand::{RngCore, SeedableRng};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

/// The mark the AI plays in [`Mode::PlayerVsAi`]. It always moves second.
pub const AI_MARK: Mark = Mark::O;

/// What kind of game the session is running.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// No game active.
    #[default]
    Menu,
    /// Two humans share the board.
    PlayerVsPlayer,
    /// Human plays X, the AI plays O.
    PlayerVsAi,
}

/// Read-only view of a session for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize)]
pub struct SessionSnapshot {
    /// Current board.
    board: Board,
    /// Outcome derived from the board.
    outcome: Outcome,
    /// Current mode.
    mode: Mode,
    /// Mark that moves next.
    turn: Mark,
    /// True while the AI's move is pending.
    ai_busy: bool,
    /// True if undo would be accepted: there is history and the AI is idle.
    can_undo: bool,
    /// Difficulty the AI will use for its next move.
    difficulty: Difficulty,
}

impl SessionSnapshot {
    /// One-line status for display.
    pub fn status_text(&self) -> String {
        if self.mode == Mode::Menu {
            return "Choose a mode to start".to_string();
        }
        match self.outcome {
            Outcome::Win { mark, .. } => format!("{} wins!", mark),
            Outcome::Draw => "It's a draw!".to_string(),
            Outcome::Ongoing if self.ai_busy => "AI is thinking...".to_string(),
            Outcome::Ongoing => format!("Turn: {}", self.turn),
        }
    }

    /// Whether a human click on `index` would currently be accepted.
    pub fn is_cell_playable(&self, index: usize) -> bool {
        self.mode != Mode::Menu
            && index < CELL_COUNT
            && self.board.is_empty(index)
            && !self.outcome.is_over()
            && !self.ai_busy
            && !(self.mode == Mode::PlayerVsAi && self.turn == AI_MARK)
    }
}

/// Error constructing a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum SessionError {
    /// The controller was created outside a tokio runtime.
    #[display("Session controller requires a tokio runtime")]
    NoRuntime,
}

/// Mutable session state guarded by the controller's mutex.
#[derive(Debug)]
struct SessionInner {
    game: GameState,
    mode: Mode,
    difficulty: Difficulty,
    ai_busy: bool,
    /// Bumped whenever a pending AI result must be discarded.
    generation: u64,
    ai_task: Option<JoinHandle<()>>,
    rng: StdRng,
}

impl SessionInner {
    fn new(config: &SessionConfig) -> Self {
        let rng = match config.rng_seed() {
            Some(seed) => StdRng::seed_from_u64(*seed),
            None => StdRng::from_entropy(),
        };
        Self {
            game: GameState::new(),
            mode: Mode::Menu,
            difficulty: *config.difficulty(),
            ai_busy: false,
            generation: 0,
            ai_task: None,
            rng,
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            board: *self.game.board(),
            outcome: self.game.outcome(),
            mode: self.mode,
            turn: self.game.to_move(),
            ai_busy: self.ai_busy,
            can_undo: self.game.can_undo() && !self.ai_busy,
            difficulty: self.difficulty,
        }
    }

    fn ai_should_move(&self) -> bool {
        self.mode == Mode::PlayerVsAi
            && !self.ai_busy
            && self.game.to_move() == AI_MARK
            && !self.game.outcome().is_over()
    }

    /// Drops any pending AI turn so its result is never applied.
    fn cancel_ai(&mut self) {
        if let Some(task) = self.ai_task.take() {
            task.abort();
        }
        if self.ai_busy {
            debug!(generation = self.generation, "Cancelling pending AI move");
        }
        self.generation += 1;
        self.ai_busy = false;
    }

    fn is_current(&self, generation: u64) -> bool {
        if generation != self.generation {
            debug!(
                generation,
                current = self.generation,
                "Discarding stale AI result"
            );
            return false;
        }
        true
    }

    fn ai_turn_applies(&self) -> bool {
        let applies = self.mode == Mode::PlayerVsAi && self.game.to_move() == AI_MARK;
        if !applies {
            debug!(mode = %self.mode, "AI turn no longer applies");
        }
        applies
    }

    /// Captures what the AI needs to decide the turn tagged `generation`.
    ///
    /// The session stays busy until [`Self::finish_ai_turn`]. Returns `None`
    /// for a stale turn, or releases the turn when it is no longer the AI's.
    fn begin_ai_turn(&mut self, generation: u64) -> Option<AiDecision> {
        if !self.is_current(generation) {
            return None;
        }
        if !self.ai_turn_applies() {
            self.ai_busy = false;
            return None;
        }
        Some(AiDecision {
            board: *self.game.board(),
            difficulty: self.difficulty,
            rng: StdRng::seed_from_u64(self.rng.next_u64()),
        })
    }

    /// Applies the decision for the turn tagged `generation`.
    ///
    /// Stale turns (reset or mode change since scheduling) are ignored.
    /// Turn and legality are re-checked here against the current board.
    fn finish_ai_turn(
        &mut self,
        generation: u64,
        decision: Result<usize, StrategyError>,
    ) -> Option<Move> {
        if !self.is_current(generation) {
            return None;
        }
        self.ai_busy = false;

        if !self.ai_turn_applies() {
            return None;
        }

        let index = match decision {
            Ok(index) => index,
            Err(e) => {
                error!(error = %e, "AI asked to move on a finished board");
                return None;
            }
        };

        match self.game.apply_move(index) {
            Ok(mv) => {
                info!(index, difficulty = %self.difficulty, "AI moved");
                Some(mv)
            }
            Err(e) => {
                warn!(index, error = %e, "AI move rejected");
                None
            }
        }
    }

    /// Releases the turn tagged `generation` when its decision never arrived.
    fn abandon_ai_turn(&mut self, generation: u64) {
        if self.is_current(generation) {
            self.ai_busy = false;
        }
    }
}

/// Inputs to one AI decision, taken under the lock and searched outside it.
#[derive(Debug)]
struct AiDecision {
    board: Board,
    difficulty: Difficulty,
    rng: StdRng,
}

impl AiDecision {
    fn decide(mut self) -> Result<usize, StrategyError> {
        strategist::choose_move(&self.board, AI_MARK, self.difficulty, &mut self.rng)
    }
}

/// Drives a tic-tac-toe session for a presentation layer.
#[derive(Debug, Clone)]
pub struct SessionController {
    inner: Arc<Mutex<SessionInner>>,
    config: Arc<SessionConfig>,
    runtime: Handle,
}

impl SessionController {
    /// Creates a session at the menu.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoRuntime`] when called outside a tokio
    /// runtime; AI turns are spawned on the runtime captured here.
    #[instrument(skip(config))]
    pub fn new(config: SessionConfig) -> Result<Self, SessionError> {
        let runtime = Handle::try_current().map_err(|_| SessionError::NoRuntime)?;
        info!(difficulty = %config.difficulty(), "Creating session");
        Ok(Self {
            inner: Arc::new(Mutex::new(SessionInner::new(&config))),
            config: Arc::new(config),
            runtime,
        })
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the configuration in use.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns a snapshot for rendering.
    pub fn state(&self) -> SessionSnapshot {
        self.lock().snapshot()
    }

    /// Human move attempt at `index`.
    ///
    /// # Errors
    ///
    /// Returns a [`MoveError`] and changes nothing if the session is at the
    /// menu, the AI is thinking, it is the AI's turn, or the move is illegal.
    #[instrument(skip(self))]
    pub fn request_move(&self, index: usize) -> Result<Move, MoveError> {
        let mut inner = self.lock();

        let result = Self::check_human_turn(&inner).and_then(|()| inner.game.apply_move(index));
        match result {
            Ok(mv) => {
                self.schedule_ai(&mut inner);
                Ok(mv)
            }
            Err(e) => {
                debug!(index, error = %e, "Move rejected");
                Err(e)
            }
        }
    }

    fn check_human_turn(inner: &SessionInner) -> Result<(), MoveError> {
        if inner.mode == Mode::Menu {
            return Err(MoveError::NoActiveGame);
        }
        if inner.ai_busy {
            return Err(MoveError::AiBusy);
        }
        if inner.mode == Mode::PlayerVsAi && inner.game.to_move() == AI_MARK {
            return Err(MoveError::WrongPlayer(AI_MARK));
        }
        Ok(())
    }

    /// Takes back the most recent move.
    ///
    /// Returns `false` without changing anything if there is no history or
    /// the AI is thinking. If the undo hands the turn to the AI, the AI
    /// moves again.
    #[instrument(skip(self))]
    pub fn request_undo(&self) -> bool {
        let mut inner = self.lock();
        if inner.ai_busy {
            debug!("Undo rejected while AI is thinking");
            return false;
        }
        if inner.game.undo().is_none() {
            return false;
        }
        self.schedule_ai(&mut inner);
        true
    }

    /// Clears the board and, if `to_menu`, returns to the menu.
    ///
    /// Any pending AI move is cancelled.
    #[instrument(skip(self))]
    pub fn request_reset(&self, to_menu: bool) {
        let mut inner = self.lock();
        inner.cancel_ai();
        inner.game.reset();
        if to_menu {
            inner.mode = Mode::Menu;
        }
        info!(mode = %inner.mode, "Session reset");
    }

    /// Switches mode and starts a fresh game.
    #[instrument(skip(self))]
    pub fn set_mode(&self, mode: Mode) {
        let mut inner = self.lock();
        inner.cancel_ai();
        inner.game.reset();
        inner.mode = mode;
        info!(%mode, "Mode changed");
    }

    /// Changes the AI policy; applies from the AI's next decision.
    #[instrument(skip(self))]
    pub fn set_difficulty(&self, difficulty: Difficulty) {
        self.lock().difficulty = difficulty;
        info!(%difficulty, "Difficulty changed");
    }

    /// Waits until no AI turn is pending.
    pub async fn wait_for_ai(&self) {
        loop {
            let task = self.lock().ai_task.take();
            match task {
                Some(task) => {
                    if let Err(e) = task.await {
                        debug!(error = %e, "AI task ended without completing");
                    }
                }
                None => return,
            }
        }
    }

    /// Spawns the AI's turn if it is due.
    fn schedule_ai(&self, inner: &mut SessionInner) {
        if !inner.ai_should_move() {
            return;
        }

        inner.generation += 1;
        inner.ai_busy = true;
        let generation = inner.generation;
        let delay = self.config.thinking_delay(inner.difficulty);
        debug!(generation, ?delay, "Scheduling AI move");

        let controller = self.clone();
        let task = self.runtime.spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let decision = controller.lock().begin_ai_turn(generation);
            let Some(decision) = decision else {
                return;
            };
            match tokio::task::spawn_blocking(move || decision.decide()).await {
                Ok(choice) => {
                    controller.lock().finish_ai_turn(generation, choice);
                }
                Err(e) => {
                    error!(error = %e, "AI decision task failed");
                    controller.lock().abandon_ai_turn(generation);
                }
            }
        });
        inner.ai_task = Some(task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inner_in_ai_turn() -> SessionInner {
        let mut inner = SessionInner::new(&SessionConfig::instant().with_seed(1));
        inner.mode = Mode::PlayerVsAi;
        inner.game.apply_move(4).unwrap();
        inner.generation = 3;
        inner.ai_busy = true;
        inner
    }

    #[test]
    fn test_ai_turn_applies_move() {
        let mut inner = inner_in_ai_turn();
        let decision = inner.begin_ai_turn(3).unwrap();
        assert!(inner.ai_busy);
        assert_eq!(*inner.game.board(), decision.board);

        let choice = decision.decide();
        let mv = inner.finish_ai_turn(3, choice).unwrap();
        assert_eq!(mv, Move::new(Mark::O, 0));
        assert!(!inner.ai_busy);
        assert_eq!(inner.game.to_move(), Mark::X);
    }

    #[test]
    fn test_stale_ai_turn_never_starts() {
        let mut inner = inner_in_ai_turn();
        inner.cancel_ai();
        inner.game.reset();

        assert!(inner.begin_ai_turn(3).is_none());
        assert_eq!(inner.game, GameState::new());
    }

    #[test]
    fn test_reset_during_decision_discards_result() {
        let mut inner = inner_in_ai_turn();
        let choice = inner.begin_ai_turn(3).unwrap().decide();
        assert_eq!(choice, Ok(0));

        inner.cancel_ai();
        inner.game.reset();

        assert_eq!(inner.finish_ai_turn(3, choice), None);
        assert_eq!(inner.game, GameState::new());
        assert!(!inner.ai_busy);
    }

    #[test]
    fn test_failed_decision_releases_turn() {
        let mut inner = inner_in_ai_turn();
        inner.abandon_ai_turn(2);
        assert!(inner.ai_busy);
        inner.abandon_ai_turn(3);
        assert!(!inner.ai_busy);
        assert_eq!(inner.game.board().empty_cells().len(), 8);
    }

    #[test]
    fn test_ai_turn_ignored_when_not_ai_to_move() {
        let mut inner = inner_in_ai_turn();
        inner.game.undo();
        assert!(inner.begin_ai_turn(3).is_none());
        assert!(!inner.ai_busy);
        assert_eq!(inner.game.board().empty_cells().len(), 9);
    }

    #[test]
    fn test_snapshot_disallows_undo_while_ai_busy() {
        let mut inner = inner_in_ai_turn();
        assert!(!inner.snapshot().can_undo);
        inner.ai_busy = false;
        assert!(inner.snapshot().can_undo);
    }

    #[test]
    fn test_human_cannot_move_for_ai() {
        let mut inner = inner_in_ai_turn();
        inner.ai_busy = false;
        assert_eq!(
            SessionController::check_human_turn(&inner),
            Err(MoveError::WrongPlayer(AI_MARK))
        );
        inner.ai_busy = true;
        assert_eq!(
            SessionController::check_human_turn(&inner),
            Err(MoveError::AiBusy)
        );
    }

    #[test]
    fn test_status_text() {
        let mut inner = inner_in_ai_turn();
        assert_eq!(inner.snapshot().status_text(), "AI is thinking...");
        inner.ai_busy = false;
        assert_eq!(inner.snapshot().status_text(), "Turn: O");
        inner.mode = Mode::Menu;
        assert_eq!(inner.snapshot().status_text(), "Choose a mode to start");
    }

    #[test]
    fn test_cells_not_playable_on_ai_turn() {
        let mut inner = inner_in_ai_turn();
        inner.ai_busy = false;
        let snapshot = inner.snapshot();
        assert!((0..9).all(|i| !snapshot.is_cell_playable(i)));

        inner.mode = Mode::PlayerVsPlayer;
        let snapshot = inner.snapshot();
        assert!(snapshot.is_cell_playable(0));
        assert!(!snapshot.is_cell_playable(4));
        assert!(!snapshot.is_cell_playable(9));
    }
}
