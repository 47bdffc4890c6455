//! Vector formation: exactly-four lines, node promotion and removal
//!
//! A placement that completes a run of exactly 4 same-color pieces on an
//! axis forms a vector. The placed piece becomes a node (protection level =
//! number of vectors formed); every other member of each vector is removed
//! unless it is already a node.

use serde::{Deserialize, Serialize};

use crate::board::{Board, Color, Direction, Pos, LINE_LENGTH};

/// A formed line of exactly 4 same-color pieces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vector {
    /// The four cells in axis order
    pub positions: [Pos; LINE_LENGTH],
    pub direction: Direction,
}

/// Outcome of checking one placement for vectors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineResult {
    pub lines_formed: u8,
    pub vectors: Vec<Vector>,
    pub pieces_to_remove: Vec<Pos>,
}

impl LineResult {
    #[inline]
    pub fn formed_any(&self) -> bool {
        self.lines_formed > 0
    }
}

/// Count vectors a `color` piece at `pos` would form. No allocation.
///
/// The cell at `pos` is treated as holding `color` whether or not it does.
#[inline]
pub fn count_lines(board: &Board, pos: Pos, color: Color) -> u8 {
    let mut lines = 0;
    for dir in Direction::ALL {
        let (dr, dc) = dir.delta();
        let total = 1 + board.run_length(pos, dr, dc, color) + board.run_length(pos, -dr, -dc, color);
        if total == LINE_LENGTH {
            lines += 1;
        }
    }
    lines
}

/// Detect the vectors formed by a `color` piece at `pos`.
///
/// Runs longer than 4 cannot arise through legal play; if one is present it
/// simply does not count as a vector.
pub fn detect_lines(board: &Board, pos: Pos, color: Color) -> LineResult {
    let mut result = LineResult::default();

    for dir in Direction::ALL {
        let (dr, dc) = dir.delta();
        let back = board.run_length(pos, -dr, -dc, color);
        let fwd = board.run_length(pos, dr, dc, color);
        if 1 + back + fwd != LINE_LENGTH {
            continue;
        }

        let mut positions = [pos; LINE_LENGTH];
        for (slot, step) in positions.iter_mut().zip(-(back as i32)..=fwd as i32) {
            if let Some(cell) = pos.offset(dr, dc, step) {
                *slot = cell;
            }
        }

        for &cell in &positions {
            if cell != pos && !board.is_node(cell) && !result.pieces_to_remove.contains(&cell) {
                result.pieces_to_remove.push(cell);
            }
        }

        result.lines_formed += 1;
        result.vectors.push(Vector {
            positions,
            direction: dir,
        });
    }

    result
}

/// Resolve vectors for a piece already placed at `pos`: promote it to a
/// node and clear the removable cells. Returns what was detected.
pub fn execute_lines(board: &mut Board, pos: Pos, color: Color) -> LineResult {
    let result = detect_lines(board, pos, color);
    if result.formed_any() {
        board.set_protection(pos, result.lines_formed);
        for &cell in &result.pieces_to_remove {
            board.remove(cell);
        }
    }
    result
}

/// Copy of `board` after `color` plays at `pos`, with vectors resolved.
/// The caller is responsible for legality.
pub fn simulate_move(board: &Board, pos: Pos, color: Color) -> Board {
    let mut next = board.clone();
    next.place_stone(pos, color);
    execute_lines(&mut next, pos, color);
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Piece;

    #[test]
    fn test_no_line_on_empty_board() {
        let board = Board::new();
        let result = detect_lines(&board, Pos::new(3, 3), Color::White);
        assert_eq!(result, LineResult::default());
        assert_eq!(count_lines(&board, Pos::new(3, 3), Color::White), 0);
    }

    #[test]
    fn test_horizontal_vector() {
        let mut board = Board::new();
        for c in 0..3 {
            board.place_stone(Pos::new(0, c), Color::White);
        }
        let result = detect_lines(&board, Pos::new(0, 3), Color::White);

        assert_eq!(result.lines_formed, 1);
        assert_eq!(result.vectors[0].direction, Direction::Horizontal);
        assert_eq!(
            result.vectors[0].positions,
            [Pos::new(0, 0), Pos::new(0, 1), Pos::new(0, 2), Pos::new(0, 3)]
        );
        assert_eq!(
            result.pieces_to_remove,
            vec![Pos::new(0, 0), Pos::new(0, 1), Pos::new(0, 2)]
        );
    }

    #[test]
    fn test_existing_nodes_survive() {
        let mut board = Board::new();
        board.place(Pos::new(4, 1), Piece::node(Color::Black, 1));
        board.place_stone(Pos::new(4, 2), Color::Black);
        board.place_stone(Pos::new(4, 4), Color::Black);

        let result = detect_lines(&board, Pos::new(4, 3), Color::Black);
        assert_eq!(result.lines_formed, 1);
        assert_eq!(result.pieces_to_remove, vec![Pos::new(4, 2), Pos::new(4, 4)]);
    }

    #[test]
    fn test_double_vector() {
        let mut board = Board::new();
        // Horizontal arm and vertical arm meeting at (3,3)
        for c in 0..3 {
            board.place_stone(Pos::new(3, c), Color::White);
        }
        for r in 4..7 {
            board.place_stone(Pos::new(r, 3), Color::White);
        }
        let result = detect_lines(&board, Pos::new(3, 3), Color::White);
        assert_eq!(result.lines_formed, 2);
        assert_eq!(result.pieces_to_remove.len(), 6);
        assert_eq!(result.vectors[0].direction, Direction::Horizontal);
        assert_eq!(result.vectors[1].direction, Direction::Vertical);
    }

    #[test]
    fn test_run_of_three_is_not_a_vector() {
        let mut board = Board::new();
        board.place_stone(Pos::new(6, 6), Color::Black);
        board.place_stone(Pos::new(5, 5), Color::Black);
        assert_eq!(count_lines(&board, Pos::new(4, 4), Color::Black), 0);
    }

    #[test]
    fn test_overlong_run_is_skipped() {
        let mut board = Board::new();
        for c in [0, 1, 3, 4] {
            board.place_stone(Pos::new(1, c), Color::White);
        }
        let result = detect_lines(&board, Pos::new(1, 2), Color::White);
        assert_eq!(result.lines_formed, 0);
    }

    #[test]
    fn test_opponent_piece_breaks_run() {
        let mut board = Board::new();
        board.place_stone(Pos::new(0, 0), Color::White);
        board.place_stone(Pos::new(0, 1), Color::Black);
        board.place_stone(Pos::new(0, 2), Color::White);
        board.place_stone(Pos::new(0, 3), Color::White);
        assert_eq!(count_lines(&board, Pos::new(0, 4), Color::White), 0);
    }

    #[test]
    fn test_execute_lines_promotes_and_removes() {
        let mut board = Board::new();
        for r in 0..3 {
            board.place_stone(Pos::new(r, 0), Color::Black);
        }
        board.place_stone(Pos::new(3, 0), Color::Black);
        let result = execute_lines(&mut board, Pos::new(3, 0), Color::Black);

        assert_eq!(result.lines_formed, 1);
        assert_eq!(board.get(Pos::new(3, 0)), Some(Piece::node(Color::Black, 1)));
        assert_eq!(board.piece_count(), 1);
    }

    #[test]
    fn test_simulate_move_leaves_original() {
        let mut board = Board::new();
        for c in 1..4 {
            board.place_stone(Pos::new(7, c), Color::White);
        }
        let before = board.clone();
        let next = simulate_move(&board, Pos::new(7, 4), Color::White);

        assert_eq!(board, before);
        assert_eq!(next.piece_count(), 1);
        assert_eq!(next.protection(Pos::new(7, 4)), 1);
    }

    #[test]
    fn test_detect_is_pure() {
        let mut board = Board::new();
        for c in 0..3 {
            board.place_stone(Pos::new(2, c), Color::White);
        }
        let before = board.clone();
        let a = detect_lines(&board, Pos::new(2, 3), Color::White);
        let b = detect_lines(&board, Pos::new(2, 3), Color::White);
        assert_eq!(a, b);
        assert_eq!(board, before);
    }
}
