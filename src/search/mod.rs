//! Search module for the Flux AI
//!
//! Contains:
//! - The tactical priority ladder and Nexus win / block scans
//! - Positional scoring and one-ply lookahead
//! - Alpha-Beta search with iterative deepening

pub mod alphabeta;
pub mod lookahead;
pub mod tactics;

pub use alphabeta::{order_moves, quick_score, target_depth, SearchResult, Searcher, WIN};
pub use lookahead::{best_lookahead, best_positional, opponent_threat, positional_score};
pub use tactics::{instant_win, prevent_nexus, priority_ladder, Tactic, TacticalMove};
