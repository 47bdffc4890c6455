//! Board representation for Flux

pub mod bitboard;
pub mod board;


use std::fmt;

use serde::{Deserialize, Serialize};

// Re-exports
pub use bitboard::Bitboard;
pub use board::Board;

/// Board size (8x8)
pub const BOARD_SIZE: usize = 8;
pub const TOTAL_CELLS: usize = BOARD_SIZE * BOARD_SIZE; // 64

/// Length of a vector; also the longest same-color run allowed on the board
pub const LINE_LENGTH: usize = 4;

/// Highest protection level a node can reach (one vector per axis)
pub const MAX_PROTECTION: u8 = 4;

/// Piece colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Get opponent color
    #[inline]
    pub fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => f.write_str("white"),
            Color::Black => f.write_str("black"),
        }
    }
}

/// A placed ion. `protection_level > 0` makes it a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    #[serde(rename = "color")]
    pub owner: Color,
    #[serde(rename = "protectionLevel")]
    pub protection_level: u8,
}

impl Piece {
    /// A fresh, unprotected ion
    #[inline]
    pub const fn ion(owner: Color) -> Self {
        Self {
            owner,
            protection_level: 0,
        }
    }

    /// A node anchoring `level` vectors
    #[inline]
    pub const fn node(owner: Color, level: u8) -> Self {
        Self {
            owner,
            protection_level: level,
        }
    }

    #[inline]
    pub fn is_node(self) -> bool {
        self.protection_level > 0
    }
}

/// Position on the board. Doubles as the move type: a placement on an empty cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub row: u8,
    pub col: u8,
}

/// A move is a placement at a position
pub type Move = Pos;

impl Pos {
    #[inline]
    pub fn new(row: u8, col: u8) -> Self {
        debug_assert!(row < BOARD_SIZE as u8 && col < BOARD_SIZE as u8);
        Self { row, col }
    }

    /// Checked constructor for untrusted coordinates
    #[inline]
    pub fn try_new(row: i32, col: i32) -> Option<Self> {
        if Self::is_valid(row, col) {
            Some(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    #[inline]
    pub fn to_index(self) -> usize {
        self.row as usize * BOARD_SIZE + self.col as usize
    }

    #[inline]
    pub fn from_index(idx: usize) -> Self {
        Self {
            row: (idx / BOARD_SIZE) as u8,
            col: (idx % BOARD_SIZE) as u8,
        }
    }

    #[inline]
    pub fn is_valid(row: i32, col: i32) -> bool {
        row >= 0 && row < BOARD_SIZE as i32 && col >= 0 && col < BOARD_SIZE as i32
    }

    /// The cell `steps` away along `(dr, dc)`, if it is on the board
    #[inline]
    pub fn offset(self, dr: i32, dc: i32, steps: i32) -> Option<Pos> {
        Self::try_new(self.row as i32 + dr * steps, self.col as i32 + dc * steps)
    }

    /// Algebraic label: file `A..H` from the column, rank `8..1` from the row.
    pub fn notation(self) -> String {
        let file = (b'A' + self.col) as char;
        let rank = BOARD_SIZE as u8 - self.row;
        format!("{file}{rank}")
    }

    /// Parse an algebraic label such as `A8` or `e4`.
    pub fn from_notation(label: &str) -> Option<Pos> {
        let mut chars = label.trim().chars();
        let file = chars.next()?.to_ascii_uppercase();
        let rank: i32 = chars.as_str().parse().ok()?;
        if !file.is_ascii_uppercase() {
            return None;
        }
        let col = file as i32 - 'A' as i32;
        let row = BOARD_SIZE as i32 - rank;
        Self::try_new(row, col)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.notation())
    }
}

impl PartialOrd for Pos {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pos {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.to_index().cmp(&other.to_index())
    }
}

/// The four line axes, in scan order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    Horizontal,
    Vertical,
    DiagonalRight,
    DiagonalLeft,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Horizontal,
        Direction::Vertical,
        Direction::DiagonalRight,
        Direction::DiagonalLeft,
    ];

    /// Unit step `(dr, dc)` of the axis
    #[inline]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Horizontal => (0, 1),
            Direction::Vertical => (1, 0),
            Direction::DiagonalRight => (1, 1),
            Direction::DiagonalLeft => (1, -1),
        }
    }
}
