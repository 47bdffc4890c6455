//! Error types for the rule engine, session authority and AI engine

use thiserror::Error;

use crate::board::{Color, Pos};

/// A rejected placement. Nothing is mutated when this is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IllegalMove {
    #[error("game is over")]
    GameOver,
    #[error("({row}, {col}) is off the board")]
    OutOfBounds { row: i32, col: i32 },
    #[error("{0} is already occupied")]
    Occupied(Pos),
    #[error("placing at {0} would create a line longer than 4 ions")]
    LineTooLong(Pos),
    #[error("not your turn: {expected} to move, {requested} requested")]
    NotYourTurn { expected: Color, requested: Color },
}

/// Errors raised by the session layer above the rule engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Illegal(#[from] IllegalMove),
    #[error("player is not seated in this game")]
    UnknownPlayer,
    #[error("review index {index} out of range (history has {len} entries)")]
    ReviewOutOfRange { index: usize, len: usize },
}

/// AI computation failure. Recovered by the engine with a random legal move.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("engine selected illegal move {0}")]
    IllegalSelection(Pos),
    #[error("engine panicked: {0}")]
    Panicked(String),
}

/// A snapshot that cannot be turned back into a consistent session.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("invalid snapshot json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("protection level {level} at {pos} exceeds 4")]
    InvalidProtectionLevel { pos: Pos, level: u8 },
    #[error("{color} score {score} does not match on-board protection total {total}")]
    InconsistentScores { color: Color, score: u32, total: u32 },
}
