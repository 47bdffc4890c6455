//! Scoring weights for Flux evaluation
//!
//! The weights are deliberately asymmetric between the side to move and its
//! opponent, so the evaluation is not zero-sum and the search uses explicit
//! max / min plies instead of negamax.

use crate::board::{Pos, BOARD_SIZE};

/// Weights used by the board evaluation and the move heuristics
pub struct EvalWeight;

impl EvalWeight {
    // Nodes
    /// Per level-weighted own node
    pub const NODE_SELF: i32 = 150;
    /// Per level-weighted opponent node
    pub const NODE_OPPONENT: i32 = 130;
    /// Extra value of own nodes at level 2, 3, 4
    pub const NODE_LEVEL_BONUS_SELF: [i32; 3] = [50, 120, 200];
    /// Extra value of opponent nodes at level 2, 3, 4
    pub const NODE_LEVEL_BONUS_OPPONENT: [i32; 3] = [40, 100, 180];

    // Nexus potential multipliers
    pub const NEXUS_SELF: i32 = 70;
    pub const NEXUS_OPPONENT: i32 = 80;
    /// Additional late-game multipliers (more than 30 pieces)
    pub const NEXUS_LATE_SELF: i32 = 40;
    pub const NEXUS_LATE_OPPONENT: i32 = 50;

    // Viable connections
    pub const PAIR_SELF: i32 = 15;
    pub const TRIPLE_SELF: i32 = 40;
    pub const PAIR_OPPONENT: i32 = 10;
    pub const TRIPLE_OPPONENT: i32 = 50;

    // Positional control
    pub const CENTER_BLOCK: i32 = 10;
    pub const QUADRANT_MAJORITY: i32 = 5;

    // Mobility
    pub const MOBILITY_SELF: i32 = 3;
    pub const MOBILITY_OPPONENT: i32 = 2;

    // Path between two aligned nodes
    pub const PATH_EMPTY: i32 = 10;
    pub const PATH_OWN_NODE: i32 = 40;
    pub const PATH_OWN_ION: i32 = 15;
    pub const PATH_OPPONENT_NODE: i32 = -30;
    pub const PATH_OPPONENT_ION: i32 = -10;

    // Move heuristics
    pub const DISTANCE: i32 = 5;
    pub const ADJACENT_OWN: i32 = 20;
    pub const ADJACENT_OPPONENT: i32 = 10;
    pub const PAIR_BLOCK: i32 = 15;
    pub const PAIR_EXTEND: i32 = 15;
    pub const THREAT_PER_LINE: i32 = 25;
    pub const THREAT_TRIPLE: i32 = 20;
    pub const QUICK_LINE: i32 = 100;
    pub const QUICK_BLOCK: i32 = 80;
    pub const QUICK_EXTEND: i32 = 50;
}

/// Game phase thresholds, by total pieces on the board
pub const EARLY_GAME_PIECES: u32 = 15;
pub const LATE_GAME_PIECES: u32 = 30;

/// Manhattan distance from the geometric center (3.5, 3.5).
///
/// Both coordinate offsets are half-integers, so the sum is always a whole
/// number in `1..=7`.
#[inline]
pub fn distance_from_center(pos: Pos) -> i32 {
    let span = BOARD_SIZE as i32 - 1;
    ((2 * pos.row as i32 - span).abs() + (2 * pos.col as i32 - span).abs()) / 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_from_center() {
        assert_eq!(distance_from_center(Pos::new(3, 3)), 1);
        assert_eq!(distance_from_center(Pos::new(4, 4)), 1);
        assert_eq!(distance_from_center(Pos::new(3, 4)), 1);
        assert_eq!(distance_from_center(Pos::new(2, 3)), 2);
        assert_eq!(distance_from_center(Pos::new(0, 0)), 7);
        assert_eq!(distance_from_center(Pos::new(7, 0)), 7);
    }

    #[test]
    fn test_opponent_weighting_hierarchy() {
        // Opponent threats weigh more than own at the Nexus level
        assert!(EvalWeight::NEXUS_OPPONENT > EvalWeight::NEXUS_SELF);
        assert!(EvalWeight::TRIPLE_OPPONENT > EvalWeight::TRIPLE_SELF);
        // Own nodes weigh more than opponent nodes
        assert!(EvalWeight::NODE_SELF > EvalWeight::NODE_OPPONENT);
    }
}
