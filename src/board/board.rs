//! Board structure with per-cell protection levels

use std::fmt;

use serde::{Deserialize, Serialize};

use super::bitboard::Bitboard;
use super::{Color, Piece, Pos, BOARD_SIZE, MAX_PROTECTION, TOTAL_CELLS};
use crate::error::SnapshotError;

/// Game board: one occupancy bitboard per color plus the protection level of every cell.
///
/// Serializes as the wire shape `8x8 array of null | {color, protectionLevel}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "BoardCells", try_from = "BoardCells")]
pub struct Board {
    /// White ions and nodes
    pub white: Bitboard,
    /// Black ions and nodes
    pub black: Bitboard,
    /// Protection level per cell; zero for empty cells and plain ions
    levels: [u8; TOTAL_CELLS],
}

/// Row-major cell matrix used on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardCells(pub [[Option<Piece>; BOARD_SIZE]; BOARD_SIZE]);

impl Board {
    pub fn new() -> Self {
        Self {
            white: Bitboard::new(),
            black: Bitboard::new(),
            levels: [0; TOTAL_CELLS],
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        BOARD_SIZE
    }

    /// Get piece at position
    #[inline]
    pub fn get(&self, pos: Pos) -> Option<Piece> {
        let owner = self.color_at(pos)?;
        Some(Piece::node(owner, self.levels[pos.to_index()]))
    }

    /// Owner of the piece at position, if any
    #[inline]
    pub fn color_at(&self, pos: Pos) -> Option<Color> {
        if self.white.get(pos) {
            Some(Color::White)
        } else if self.black.get(pos) {
            Some(Color::Black)
        } else {
            None
        }
    }

    #[inline]
    pub fn is_color(&self, pos: Pos, color: Color) -> bool {
        self.stones(color).get(pos)
    }

    /// Check if position is empty
    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        !self.white.get(pos) && !self.black.get(pos)
    }

    /// Check if position holds a node of any color
    #[inline]
    pub fn is_node(&self, pos: Pos) -> bool {
        self.levels[pos.to_index()] > 0
    }

    #[inline]
    pub fn protection(&self, pos: Pos) -> u8 {
        self.levels[pos.to_index()]
    }

    /// Place a piece, replacing whatever occupied the cell.
    /// Use `GameSession::apply_move` for game moves.
    #[inline]
    pub fn place(&mut self, pos: Pos, piece: Piece) {
        self.remove(pos);
        self.stones_mut(piece.owner).set(pos);
        self.levels[pos.to_index()] = piece.protection_level;
    }

    /// Place an unprotected ion (no line processing)
    #[inline]
    pub fn place_stone(&mut self, pos: Pos, color: Color) {
        self.place(pos, Piece::ion(color));
    }

    /// Set the protection level of an occupied cell
    #[inline]
    pub fn set_protection(&mut self, pos: Pos, level: u8) {
        debug_assert!(!self.is_empty(pos));
        self.levels[pos.to_index()] = level;
    }

    /// Remove a piece, returning it
    #[inline]
    pub fn remove(&mut self, pos: Pos) -> Option<Piece> {
        let piece = self.get(pos);
        self.white.clear(pos);
        self.black.clear(pos);
        self.levels[pos.to_index()] = 0;
        piece
    }

    /// Get bitboard for a color
    #[inline]
    pub fn stones(&self, color: Color) -> &Bitboard {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    #[inline]
    fn stones_mut(&mut self, color: Color) -> &mut Bitboard {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }

    /// Bitboard of every empty cell
    #[inline]
    pub fn empty_cells(&self) -> Bitboard {
        self.white.union(self.black).complement()
    }

    /// Total pieces on board
    #[inline]
    pub fn piece_count(&self) -> u32 {
        self.white.count() + self.black.count()
    }

    /// Number of nodes owned by `color`
    pub fn node_count(&self, color: Color) -> u32 {
        self.stones(color)
            .iter_ones()
            .filter(|&p| self.is_node(p))
            .count() as u32
    }

    /// Sum of protection levels of `color`'s pieces
    pub fn protection_total(&self, color: Color) -> u32 {
        self.stones(color)
            .iter_ones()
            .map(|p| u32::from(self.protection(p)))
            .sum()
    }

    /// Check if board is empty
    #[inline]
    pub fn is_board_empty(&self) -> bool {
        self.white.is_empty() && self.black.is_empty()
    }

    /// All pieces in row-major order
    pub fn pieces(&self) -> impl Iterator<Item = (Pos, Piece)> + '_ {
        self.white
            .union(self.black)
            .iter_ones()
            .filter_map(move |p| self.get(p).map(|piece| (p, piece)))
    }

    /// Number of consecutive `color` pieces starting one step from `pos` along `(dr, dc)`.
    #[inline]
    pub fn run_length(&self, pos: Pos, dr: i32, dc: i32, color: Color) -> usize {
        let stones = self.stones(color);
        let mut count = 0;
        let mut step = 1;
        while let Some(next) = pos.offset(dr, dc, step) {
            if !stones.get(next) {
                break;
            }
            count += 1;
            step += 1;
        }
        count
    }

    /// Build a board from a text diagram, one string per row.
    ///
    /// `.` empty, `w`/`b` plain ions, `W`/`B` nodes of level 1.
    /// Returns `None` on a malformed diagram.
    pub fn from_diagram(rows: &[&str]) -> Option<Board> {
        if rows.len() != BOARD_SIZE {
            return None;
        }
        let mut board = Board::new();
        for (r, line) in rows.iter().enumerate() {
            let cells: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
            if cells.len() != BOARD_SIZE {
                return None;
            }
            for (c, ch) in cells.into_iter().enumerate() {
                let pos = Pos::new(r as u8, c as u8);
                match ch {
                    '.' => {}
                    'w' => board.place(pos, Piece::ion(Color::White)),
                    'b' => board.place(pos, Piece::ion(Color::Black)),
                    'W' => board.place(pos, Piece::node(Color::White, 1)),
                    'B' => board.place(pos, Piece::node(Color::Black, 1)),
                    _ => return None,
                }
            }
        }
        Some(board)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Board> for BoardCells {
    fn from(board: Board) -> Self {
        let mut cells = [[None; BOARD_SIZE]; BOARD_SIZE];
        for (pos, piece) in board.pieces() {
            cells[pos.row as usize][pos.col as usize] = Some(piece);
        }
        BoardCells(cells)
    }
}

impl TryFrom<BoardCells> for Board {
    type Error = SnapshotError;

    fn try_from(cells: BoardCells) -> Result<Self, Self::Error> {
        let mut board = Board::new();
        for (r, row) in cells.0.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let Some(piece) = cell else { continue };
                let pos = Pos::new(r as u8, c as u8);
                if piece.protection_level > MAX_PROTECTION {
                    return Err(SnapshotError::InvalidProtectionLevel {
                        pos,
                        level: piece.protection_level,
                    });
                }
                board.place(pos, *piece);
            }
        }
        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for c in 0..BOARD_SIZE {
            write!(f, " {}", (b'A' + c as u8) as char)?;
        }
        writeln!(f)?;
        for r in 0..BOARD_SIZE {
            write!(f, "{:>2} ", BOARD_SIZE - r)?;
            for c in 0..BOARD_SIZE {
                let symbol = match self.get(Pos::new(r as u8, c as u8)) {
                    None => '.',
                    Some(p) if p.is_node() => match p.owner {
                        Color::White => 'W',
                        Color::Black => 'B',
                    },
                    Some(p) => match p.owner {
                        Color::White => 'w',
                        Color::Black => 'b',
                    },
                };
                write!(f, " {symbol}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
