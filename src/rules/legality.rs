//! Placement legality: the no-overlong-line rule
//!
//! A cell is legal for a color iff it is empty and placing that color there
//! would not create a contiguous same-color run longer than 4 on any axis.
//! Checks work on `&Board` and count neighbors around the cell as if the
//! piece were there, so nothing is ever written to the board.

use crate::board::{Board, Color, Direction, Pos, LINE_LENGTH};
use crate::error::IllegalMove;

/// Length of the same-color run through `pos` along `dir`, counting a
/// hypothetical `color` piece at `pos` itself.
#[inline]
pub fn line_length_through(board: &Board, pos: Pos, color: Color, dir: Direction) -> usize {
    let (dr, dc) = dir.delta();
    1 + board.run_length(pos, dr, dc, color) + board.run_length(pos, -dr, -dc, color)
}

/// Check if placing `color` at `pos` would create a line longer than 4
pub fn would_create_line_too_long(board: &Board, pos: Pos, color: Color) -> bool {
    Direction::ALL
        .iter()
        .any(|&dir| line_length_through(board, pos, color, dir) > LINE_LENGTH)
}

/// Check if a move is legal (empty cell, no overlong line)
#[inline]
pub fn is_legal_move(board: &Board, pos: Pos, color: Color) -> bool {
    board.is_empty(pos) && !would_create_line_too_long(board, pos, color)
}

/// Same check as [`is_legal_move`], reporting why a placement is rejected
pub fn check_placement(board: &Board, pos: Pos, color: Color) -> Result<(), IllegalMove> {
    if !board.is_empty(pos) {
        return Err(IllegalMove::Occupied(pos));
    }
    if would_create_line_too_long(board, pos, color) {
        return Err(IllegalMove::LineTooLong(pos));
    }
    Ok(())
}

/// All legal moves for `color`, in row-major order
pub fn legal_moves(board: &Board, color: Color) -> Vec<Pos> {
    board
        .empty_cells()
        .iter_ones()
        .filter(|&pos| !would_create_line_too_long(board, pos, color))
        .collect()
}

/// Whether `color` has at least one legal move
pub fn has_legal_move(board: &Board, color: Color) -> bool {
    board
        .empty_cells()
        .iter_ones()
        .any(|pos| !would_create_line_too_long(board, pos, color))
}
