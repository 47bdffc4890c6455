//! Evaluation module for Flux positions
//!
//! Pure functions over a board and a color, shared by the AI tiers:
//! - Distance from center and scoring weights
//! - Connected runs (pairs, triples) and adjacency
//! - The full board evaluation used by the expert search

pub mod connectivity;
pub mod heuristic;
pub mod patterns;

pub use connectivity::{
    extends_own_line, find_connected_runs, is_adjacent_to, viable_connections, ConnectedRuns,
    Connections, Run,
};
pub use heuristic::{
    center_control, count_nodes_by_level, evaluate, mobility, nexus_potential,
    positional_control, NodeCounts,
};
pub use patterns::{distance_from_center, EvalWeight};
