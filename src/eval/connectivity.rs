//! Connected runs (pairs and triples) and neighborhood queries

use crate::board::{Board, Color, Direction, Pos};
use crate::rules::is_legal_move;

/// A maximal same-color run of 2 or 3 pieces along one axis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    /// Cells of the run in axis order
    pub positions: Vec<Pos>,
    pub direction: Direction,
    /// In-bounds cells one past each end, occupied or not
    pub extensions: [Option<Pos>; 2],
}

impl Run {
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Extension cells that are currently empty
    pub fn open_extensions<'a>(&'a self, board: &'a Board) -> impl Iterator<Item = Pos> + 'a {
        self.extensions
            .iter()
            .flatten()
            .copied()
            .filter(move |&p| board.is_empty(p))
    }
}

/// All pairs and triples of one color
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectedRuns {
    pub pairs: Vec<Run>,
    pub triples: Vec<Run>,
}

impl ConnectedRuns {
    /// Empty cells extending any pair, first occurrence order, no duplicates
    pub fn pair_extensions(&self, board: &Board) -> Vec<Pos> {
        open_cells(&self.pairs, board)
    }

    /// Empty cells extending any triple, first occurrence order, no duplicates
    pub fn triple_extensions(&self, board: &Board) -> Vec<Pos> {
        open_cells(&self.triples, board)
    }
}

fn open_cells(runs: &[Run], board: &Board) -> Vec<Pos> {
    let mut cells = Vec::new();
    for run in runs {
        for pos in run.open_extensions(board) {
            if !cells.contains(&pos) {
                cells.push(pos);
            }
        }
    }
    cells
}

/// Find every maximal run of exactly 2 or exactly 3 `color` pieces.
///
/// Runs are discovered from their first cell (no same-color piece one step
/// back along the axis), scanning pieces in row-major order.
pub fn find_connected_runs(board: &Board, color: Color) -> ConnectedRuns {
    let mut runs = ConnectedRuns::default();

    for pos in board.stones(color).iter_ones() {
        for dir in Direction::ALL {
            let (dr, dc) = dir.delta();
            if board.run_length(pos, -dr, -dc, color) > 0 {
                continue;
            }
            let len = 1 + board.run_length(pos, dr, dc, color);
            if len != 2 && len != 3 {
                continue;
            }

            let positions: Vec<Pos> = (0..len as i32)
                .filter_map(|step| pos.offset(dr, dc, step))
                .collect();
            let run = Run {
                positions,
                direction: dir,
                extensions: [pos.offset(dr, dc, -1), pos.offset(dr, dc, len as i32)],
            };

            if len == 2 {
                runs.pairs.push(run);
            } else {
                runs.triples.push(run);
            }
        }
    }

    runs
}

/// Pairs and triples that can still grow
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Connections {
    pub pairs: i32,
    pub triples: i32,
}

/// Count runs with at least one empty extension cell that is legal for `color`
pub fn viable_connections(board: &Board, color: Color) -> Connections {
    let runs = find_connected_runs(board, color);
    let viable = |run: &&Run| {
        run.open_extensions(board)
            .any(|p| is_legal_move(board, p, color))
    };
    Connections {
        pairs: runs.pairs.iter().filter(viable).count() as i32,
        triples: runs.triples.iter().filter(viable).count() as i32,
    }
}

/// Whether any of the 8 neighbors of `pos` holds a `color` piece
pub fn is_adjacent_to(board: &Board, pos: Pos, color: Color) -> bool {
    (-1..=1)
        .flat_map(|dr| (-1..=1).map(move |dc| (dr, dc)))
        .filter(|&d| d != (0, 0))
        .filter_map(|(dr, dc)| pos.offset(dr, dc, 1))
        .any(|n| board.is_color(n, color))
}

/// Whether a `color` piece at `pos` would touch an own piece along some axis
#[inline]
pub fn extends_own_line(board: &Board, pos: Pos, color: Color) -> bool {
    // Every 8-neighbor lies on one of the four axes
    is_adjacent_to(board, pos, color)
}
