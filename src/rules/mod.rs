//! Game rules for Flux
//!
//! This module is the single rule engine shared by local play, AI
//! simulation and the networked authority:
//! - Legality (no line longer than 4)
//! - Vector formation (node promotion and removal)
//! - Win conditions (Nexus, node-count tiebreak)

pub mod legality;
pub mod lines;
pub mod nexus;

// Re-exports for convenient access
pub use legality::{
    check_placement, has_legal_move, is_legal_move, legal_moves, line_length_through,
    would_create_line_too_long,
};
pub use lines::{count_lines, detect_lines, execute_lines, simulate_move, LineResult, Vector};
pub use nexus::{check_nexus, has_nexus, node_tally, Nexus, NodeTally};
