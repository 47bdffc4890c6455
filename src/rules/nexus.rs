//! Win conditions for Flux
//!
//! Win conditions:
//! 1. Nexus: four same-color nodes contiguous along one axis (instant win)
//! 2. Node count: when the side to move has no legal placement, the side
//!    with more nodes wins; equal counts are a draw

use serde::{Deserialize, Serialize};

use crate::board::{Board, Color, Direction, Pos, LINE_LENGTH};

/// A winning line of four nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nexus {
    pub winner: Color,
    pub positions: [Pos; LINE_LENGTH],
}

/// Node counts compared by the no-legal-moves tiebreak
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NodeTally {
    pub white: u32,
    pub black: u32,
}

impl NodeTally {
    /// Higher count wins; `None` is a draw
    pub fn winner(self) -> Option<Color> {
        match self.white.cmp(&self.black) {
            std::cmp::Ordering::Greater => Some(Color::White),
            std::cmp::Ordering::Less => Some(Color::Black),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Four nodes of the starting node's color from `start` along `dir`, if present.
fn nexus_from(board: &Board, start: Pos, color: Color, dir: Direction) -> Option<[Pos; LINE_LENGTH]> {
    let (dr, dc) = dir.delta();
    let mut positions = [start; LINE_LENGTH];
    for (step, slot) in positions.iter_mut().enumerate().skip(1) {
        let cell = start.offset(dr, dc, step as i32)?;
        if !board.is_color(cell, color) || !board.is_node(cell) {
            return None;
        }
        *slot = cell;
    }
    Some(positions)
}

/// Find the first Nexus on the board.
///
/// Scans node cells in row-major order and, per cell, the axes in
/// horizontal / vertical / diagonal-right / diagonal-left order. Stops at
/// the first hit.
pub fn check_nexus(board: &Board) -> Option<Nexus> {
    for pos in board.white.union(board.black).iter_ones() {
        if !board.is_node(pos) {
            continue;
        }
        let Some(color) = board.color_at(pos) else {
            continue;
        };
        for dir in Direction::ALL {
            if let Some(positions) = nexus_from(board, pos, color, dir) {
                return Some(Nexus {
                    winner: color,
                    positions,
                });
            }
        }
    }
    None
}

/// Check if `color` has a Nexus anywhere on the board
pub fn has_nexus(board: &Board, color: Color) -> bool {
    board.stones(color).iter_ones().any(|pos| {
        board.is_node(pos)
            && Direction::ALL
                .iter()
                .any(|&dir| nexus_from(board, pos, color, dir).is_some())
    })
}

/// Count nodes per color for the tiebreak
pub fn node_tally(board: &Board) -> NodeTally {
    NodeTally {
        white: board.node_count(Color::White),
        black: board.node_count(Color::Black),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Piece;

    fn nodes(board: &mut Board, color: Color, cells: &[(u8, u8)]) {
        for &(r, c) in cells {
            board.place(Pos::new(r, c), Piece::node(color, 1));
        }
    }

    #[test]
    fn test_horizontal_nexus() {
        let mut board = Board::new();
        nodes(&mut board, Color::White, &[(1, 1), (1, 2), (1, 3), (1, 4)]);
        let nexus = check_nexus(&board).unwrap();
        assert_eq!(nexus.winner, Color::White);
        assert_eq!(
            nexus.positions,
            [Pos::new(1, 1), Pos::new(1, 2), Pos::new(1, 3), Pos::new(1, 4)]
        );
        assert!(has_nexus(&board, Color::White));
        assert!(!has_nexus(&board, Color::Black));
    }

    #[test]
    fn test_diagonal_left_nexus() {
        let mut board = Board::new();
        nodes(&mut board, Color::Black, &[(2, 5), (3, 4), (4, 3), (5, 2)]);
        let nexus = check_nexus(&board).unwrap();
        assert_eq!(nexus.winner, Color::Black);
        assert_eq!(nexus.positions[0], Pos::new(2, 5));
        assert_eq!(nexus.positions[3], Pos::new(5, 2));
    }

    #[test]
    fn test_plain_ion_breaks_nexus() {
        let mut board = Board::new();
        nodes(&mut board, Color::White, &[(0, 0), (0, 1), (0, 3)]);
        board.place_stone(Pos::new(0, 2), Color::White);
        assert!(check_nexus(&board).is_none());
    }

    #[test]
    fn test_mixed_colors_no_nexus() {
        let mut board = Board::new();
        nodes(&mut board, Color::White, &[(6, 0), (6, 1), (6, 2)]);
        nodes(&mut board, Color::Black, &[(6, 3)]);
        assert!(check_nexus(&board).is_none());
    }

    #[test]
    fn test_three_nodes_no_nexus_at_edge() {
        let mut board = Board::new();
        nodes(&mut board, Color::White, &[(7, 5), (7, 6), (7, 7)]);
        assert!(check_nexus(&board).is_none());
    }

    #[test]
    fn test_scan_order_returns_first() {
        let mut board = Board::new();
        nodes(&mut board, Color::Black, &[(0, 4), (1, 4), (2, 4), (3, 4)]);
        nodes(&mut board, Color::White, &[(5, 0), (5, 1), (5, 2), (5, 3)]);
        assert_eq!(check_nexus(&board).unwrap().winner, Color::Black);
    }

    #[test]
    fn test_node_tally() {
        let mut board = Board::new();
        nodes(&mut board, Color::White, &[(0, 0), (7, 7)]);
        nodes(&mut board, Color::Black, &[(3, 3)]);
        board.place_stone(Pos::new(4, 4), Color::Black);
        let tally = node_tally(&board);
        assert_eq!(tally, NodeTally { white: 2, black: 1 });
        assert_eq!(tally.winner(), Some(Color::White));
        assert_eq!(NodeTally { white: 1, black: 1 }.winner(), None);
    }
}
