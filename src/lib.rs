//! Flux rules and AI engine
//!
//! Flux is a two-player placement game on an 8x8 board:
//! - Players alternate placing ions; white moves first
//! - No player may ever own a line longer than 4
//! - Completing a line of exactly 4 clears its plain ions and turns the
//!   placed piece into a permanent node
//! - Four nodes of one color in a row (a Nexus) wins; when the side to
//!   move has no legal placement, the node count decides
//!
//! # Architecture
//!
//! - [`board`]: Board representation with per-color bitboards
//! - [`rules`]: Legality, line detection and removal, Nexus detection
//! - [`eval`]: Position evaluation and heuristics
//! - [`search`]: Tactical ladder, lookahead and alpha-beta search
//! - [`engine`]: Four-tier AI engine integrating all components
//! - [`session`]: The authoritative game session, networked authority and
//!   local play driver
//!
//! # Quick Start
//!
//! ```
//! use flux::{AIEngine, Difficulty, GameSession};
//!
//! let mut session = GameSession::new();
//! session.apply_move(3, 3).unwrap();
//!
//! let mut engine = AIEngine::with_config(Difficulty::Hard, 500).with_seed(1);
//! if let Some(pos) = engine.select_move(session.board(), session.current_player()) {
//!     let outcome = session.apply_move(pos.row as i32, pos.col as i32).unwrap();
//!     println!("AI plays {}", outcome.record.notation);
//! }
//! ```
//!
//! # AI Tiers
//!
//! 1. Easy: central or adjacent placement with occasional random moves
//! 2. Medium: priority ladder, then positional scoring
//! 3. Hard: priority ladder, then one-ply lookahead
//! 4. Expert: instant win, Nexus prevention, then iterative-deepening
//!    alpha-beta under a time budget

pub mod board;
pub mod engine;
pub mod error;
pub mod eval;
pub mod rules;
pub mod search;
pub mod session;

// Re-export commonly used types for convenience
pub use board::{Board, Color, Direction, Piece, Pos, BOARD_SIZE, LINE_LENGTH};
pub use engine::{AIEngine, Difficulty, MoveResult, SearchType};
pub use error::{EngineError, IllegalMove, SessionError, SnapshotError};
pub use rules::{LineResult, Nexus, Vector};
pub use session::{
    Authority, EndReason, GameMode, GameOutcome, GameSession, GameUpdate, LocalGame, MoveOutcome,
    MoveRecord, Projection, Snapshot, TimeControl,
};
