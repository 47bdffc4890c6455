//! Board evaluation for the expert search
//!
//! Scores a position from the perspective of `color`, combining (largest
//! first):
//! - Node count and level
//! - Nexus potential between aligned nodes
//! - Viable pairs and triples
//! - Positional control (center block, quadrants)
//! - Mobility
//!
//! with extra center weight in the early game and extra Nexus weight late.

use crate::board::{Board, Color, Pos, BOARD_SIZE, MAX_PROTECTION};
use crate::rules::legal_moves;

use super::connectivity::viable_connections;
use super::patterns::{distance_from_center, EvalWeight, EARLY_GAME_PIECES, LATE_GAME_PIECES};

/// Node tally for one color
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeCounts {
    /// Nodes at protection level 1, 2, 3, 4
    pub by_level: [i32; MAX_PROTECTION as usize],
    /// Sum of protection levels
    pub total: i32,
}

/// Count `color`'s nodes by protection level
pub fn count_nodes_by_level(board: &Board, color: Color) -> NodeCounts {
    let mut counts = NodeCounts::default();
    for pos in board.stones(color).iter_ones() {
        let level = board.protection(pos);
        if level == 0 {
            continue;
        }
        let idx = (level.min(MAX_PROTECTION) - 1) as usize;
        counts.by_level[idx] += 1;
        counts.total += i32::from(level);
    }
    counts
}

/// Reward pairs of `color` nodes aligned on an axis within distance 3.
///
/// Each pair scores `(4 - d) * 10`, plus 5 per protection level of the two
/// nodes, plus the value of the cells between them.
pub fn nexus_potential(board: &Board, color: Color) -> i32 {
    let nodes: Vec<Pos> = board
        .stones(color)
        .iter_ones()
        .filter(|&p| board.is_node(p))
        .collect();
    if nodes.len() < 2 {
        return 0;
    }

    let mut potential = 0;
    for (i, &a) in nodes.iter().enumerate() {
        for &b in &nodes[i + 1..] {
            let dr = (a.row as i32 - b.row as i32).abs();
            let dc = (a.col as i32 - b.col as i32).abs();
            let aligned = dr == 0 || dc == 0 || dr == dc;
            let distance = dr.max(dc);
            if !aligned || distance > 3 {
                continue;
            }
            potential += (4 - distance) * 10;
            potential += (i32::from(board.protection(a)) + i32::from(board.protection(b))) * 5;
            potential += path_value(board, a, b, color);
        }
    }
    potential
}

/// Value of the cells strictly between two aligned cells, scaled down by
/// the number of cells in between.
fn path_value(board: &Board, from: Pos, to: Pos, color: Color) -> i32 {
    let dr = (to.row as i32 - from.row as i32).signum();
    let dc = (to.col as i32 - from.col as i32).signum();

    let mut score = 0;
    let mut between = 0;
    let mut step = 1;
    while let Some(cell) = from.offset(dr, dc, step) {
        if cell == to {
            break;
        }
        between += 1;
        score += match board.get(cell) {
            None => EvalWeight::PATH_EMPTY,
            Some(p) if p.owner == color && p.is_node() => EvalWeight::PATH_OWN_NODE,
            Some(p) if p.owner == color => EvalWeight::PATH_OWN_ION,
            Some(p) if p.is_node() => EvalWeight::PATH_OPPONENT_NODE,
            Some(_) => EvalWeight::PATH_OPPONENT_ION,
        };
        step += 1;
    }
    score * (4 - between)
}

/// Occupancy of the central 4x4 block (nodes count double), times 10,
/// plus a bonus for each quadrant where `color` has the majority.
pub fn positional_control(board: &Board, color: Color) -> i32 {
    let sign = |pos: Pos| -> i32 {
        match board.color_at(pos) {
            Some(c) if c == color => 1,
            Some(_) => -1,
            None => 0,
        }
    };

    let mut center = 0;
    for r in 2..=5u8 {
        for c in 2..=5u8 {
            let pos = Pos::new(r, c);
            let s = sign(pos);
            center += s;
            if board.is_node(pos) {
                center += s;
            }
        }
    }
    let mut score = center * EvalWeight::CENTER_BLOCK;

    let half = (BOARD_SIZE / 2) as u8;
    for (r0, c0) in [(0, 0), (0, half), (half, 0), (half, half)] {
        let mut control = 0;
        for r in r0..r0 + half {
            for c in c0..c0 + half {
                control += sign(Pos::new(r, c));
            }
        }
        if control > 0 {
            score += EvalWeight::QUADRANT_MAJORITY;
        }
    }
    score
}

/// Sum of `7 - distance_from_center` over `color`'s pieces, plus 5 per node
/// within distance 3 of the center.
pub fn center_control(board: &Board, color: Color) -> i32 {
    board
        .stones(color)
        .iter_ones()
        .map(|pos| {
            let dist = distance_from_center(pos);
            let node_bonus = if board.is_node(pos) && dist <= 3 { 5 } else { 0 };
            7 - dist + node_bonus
        })
        .sum()
}

/// Number of legal moves for `color`
#[inline]
pub fn mobility(board: &Board, color: Color) -> i32 {
    legal_moves(board, color).len() as i32
}

/// Evaluate the board from the perspective of `color`.
///
/// Positive values favor `color`. Not symmetric: the opponent's threats are
/// weighted more heavily than one's own.
#[must_use]
pub fn evaluate(board: &Board, color: Color) -> i32 {
    let opponent = color.opponent();
    let mut score = 0;

    // 1. Nodes
    let own = count_nodes_by_level(board, color);
    let theirs = count_nodes_by_level(board, opponent);
    score += own.total * EvalWeight::NODE_SELF;
    score -= theirs.total * EvalWeight::NODE_OPPONENT;
    for i in 0..3 {
        score += own.by_level[i + 1] * EvalWeight::NODE_LEVEL_BONUS_SELF[i];
        score -= theirs.by_level[i + 1] * EvalWeight::NODE_LEVEL_BONUS_OPPONENT[i];
    }

    // 2. Nexus potential
    let own_nexus = nexus_potential(board, color);
    let their_nexus = nexus_potential(board, opponent);
    score += own_nexus * EvalWeight::NEXUS_SELF;
    score -= their_nexus * EvalWeight::NEXUS_OPPONENT;

    // 3. Connections
    let own_links = viable_connections(board, color);
    let their_links = viable_connections(board, opponent);
    score += own_links.pairs * EvalWeight::PAIR_SELF;
    score += own_links.triples * EvalWeight::TRIPLE_SELF;
    score -= their_links.pairs * EvalWeight::PAIR_OPPONENT;
    score -= their_links.triples * EvalWeight::TRIPLE_OPPONENT;

    // 4. Position
    score += positional_control(board, color);

    // 5. Mobility
    score += mobility(board, color) * EvalWeight::MOBILITY_SELF;
    score -= mobility(board, opponent) * EvalWeight::MOBILITY_OPPONENT;

    // 6. Game phase
    let pieces = board.piece_count();
    if pieces < EARLY_GAME_PIECES {
        score += center_control(board, color) * 2;
        score -= center_control(board, opponent) * 3 / 2;
    } else if pieces > LATE_GAME_PIECES {
        score += own_nexus * EvalWeight::NEXUS_LATE_SELF;
        score -= their_nexus * EvalWeight::NEXUS_LATE_OPPONENT;
    }

    score
}
