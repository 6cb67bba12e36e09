mod action;
mod engine;
mod outcome;
mod position;
pub mod rules;
mod types;

pub use action::{Move, MoveError};
pub use engine::{GameState, HistoryEntry};
pub use outcome::{LINES, Line, Outcome};
pub use position::Position;
pub use types::{Board, BoardError, BoardParseError, CELL_COUNT, Mark, Square};
