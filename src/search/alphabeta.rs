//! Alpha-Beta search with iterative deepening for the expert tier
//!
//! The evaluation is asymmetric (opponent threats weigh more than one's
//! own), so the search runs explicit maximizing and minimizing plies from
//! the root player's point of view instead of negamax.
//!
//! # Features
//!
//! - Pre-scored, capped root candidates (top 12 by [`quick_score`])
//! - Move ordering at every ply by the same quick score
//! - Nexus detection at every node with saturating scores
//! - Wall-clock budget across the whole deepening loop; an interrupted
//!   depth is discarded and the previous complete depth is kept
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use flux::board::{Board, Color, Pos};
//! use flux::search::Searcher;
//!
//! let mut board = Board::new();
//! board.place_stone(Pos::new(3, 3), Color::Black);
//!
//! let mut searcher = Searcher::new(Duration::from_millis(200));
//! let result = searcher.search_depth(&board, Color::White, 1);
//! assert!(result.best_move.is_some());
//! ```

use std::time::{Duration, Instant};

use tracing::debug;

use crate::board::{Board, Color, Pos};
use crate::eval::{distance_from_center, evaluate, extends_own_line, EvalWeight};
use crate::rules::{count_lines, has_nexus, legal_moves, simulate_move};

/// Score of a completed Nexus
pub const WIN: i32 = 10_000;

/// Infinity score for alpha-beta bounds
const INF: i32 = WIN + 1;

/// Maximum moves considered at the root
pub const MAX_ROOT_MOVES: usize = 12;

/// Nodes between wall-clock checks
const TIME_CHECK_INTERVAL: u64 = 256;

/// Search result containing the best move found and associated statistics.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Best move from the deepest completed depth
    pub best_move: Option<Pos>,
    /// Score of the best move from the root player's point of view
    pub score: i32,
    /// Depth completed in iterative deepening (0 = none)
    pub depth: u8,
    /// Total nodes searched
    pub nodes: u64,
    /// Pre-scored top candidate, kept as a fallback
    pub top_candidate: Option<Pos>,
}

/// Fast move heuristic for ordering: vectors formed (x100), opponent
/// vectors blocked (x80), touching an own piece (+50), minus 5 per step
/// from the center.
#[inline]
pub fn quick_score(board: &Board, pos: Pos, color: Color) -> i32 {
    let mut score = i32::from(count_lines(board, pos, color)) * EvalWeight::QUICK_LINE;
    score += i32::from(count_lines(board, pos, color.opponent())) * EvalWeight::QUICK_BLOCK;
    if extends_own_line(board, pos, color) {
        score += EvalWeight::QUICK_EXTEND;
    }
    score - distance_from_center(pos) * EvalWeight::DISTANCE
}

/// Sort moves by [`quick_score`], best first. Stable, so equal scores keep
/// scan order.
pub fn order_moves(board: &Board, moves: &[Pos], color: Color) -> Vec<Pos> {
    let mut scored: Vec<(Pos, i32)> = moves
        .iter()
        .map(|&pos| (pos, quick_score(board, pos, color)))
        .collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.into_iter().map(|(pos, _)| pos).collect()
}

/// Search depth for the current game phase
#[inline]
pub fn target_depth(piece_count: u32) -> u8 {
    if piece_count < 20 {
        3
    } else if piece_count < 35 {
        2
    } else {
        1
    }
}

/// Iterative-deepening alpha-beta searcher.
pub struct Searcher {
    nodes: u64,
    start_time: Option<Instant>,
    time_limit: Duration,
    stopped: bool,
    max_root_moves: usize,
    /// Optional node budget on top of the time limit
    node_limit: Option<u64>,
}

impl Searcher {
    pub fn new(time_limit: Duration) -> Self {
        Self {
            nodes: 0,
            start_time: None,
            time_limit,
            stopped: false,
            max_root_moves: MAX_ROOT_MOVES,
            node_limit: None,
        }
    }

    /// Stop once this many nodes have been searched, whatever the clock says
    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.node_limit = Some(limit);
        self
    }

    /// Override the root candidate cap
    pub fn with_root_cap(mut self, cap: usize) -> Self {
        self.max_root_moves = cap.max(1);
        self
    }

    pub fn set_time_limit(&mut self, time_limit: Duration) {
        self.time_limit = time_limit;
    }

    /// Search to the phase-dependent target depth
    pub fn search(&mut self, board: &Board, color: Color) -> SearchResult {
        self.search_depth(board, color, target_depth(board.piece_count()))
    }

    /// Iterative deepening from depth 1 up to `max_depth`.
    pub fn search_depth(&mut self, board: &Board, color: Color, max_depth: u8) -> SearchResult {
        self.nodes = 0;
        self.stopped = false;
        self.start_time = Some(Instant::now());

        let legal = legal_moves(board, color);
        let mut candidates = order_moves(board, &legal, color);
        candidates.truncate(self.max_root_moves);

        let mut result = SearchResult {
            best_move: None,
            score: 0,
            depth: 0,
            nodes: 0,
            top_candidate: candidates.first().copied(),
        };

        for depth in 1..=max_depth {
            let Some((best, score)) = self.search_root(board, color, &candidates, depth) else {
                debug!(depth, nodes = self.nodes, "time budget reached, keeping previous depth");
                break;
            };
            result.best_move = Some(best);
            result.score = score;
            result.depth = depth;
            debug!(depth, %best, score, nodes = self.nodes, "depth complete");

            if score >= WIN {
                break;
            }
        }

        result.nodes = self.nodes;
        result
    }

    /// One full pass over the root candidates. `None` if time ran out.
    fn search_root(
        &mut self,
        board: &Board,
        color: Color,
        candidates: &[Pos],
        depth: u8,
    ) -> Option<(Pos, i32)> {
        let mut best: Option<(Pos, i32)> = None;
        let mut alpha = -INF;

        for &mov in candidates {
            if self.check_time() {
                return None;
            }
            let child = simulate_move(board, mov, color);
            let score = self.alpha_beta(&child, color, depth, alpha, INF, false);
            if self.stopped {
                return None;
            }
            if best.map_or(true, |(_, b)| score > b) {
                best = Some((mov, score));
            }
            alpha = alpha.max(score);
        }

        best
    }

    /// Check time and set the stop flag if the budget is spent.
    #[inline]
    fn check_time(&mut self) -> bool {
        if self.stopped {
            return true;
        }
        if self.node_limit.is_some_and(|limit| self.nodes >= limit) {
            self.stopped = true;
            return true;
        }
        if let Some(start) = self.start_time {
            if start.elapsed() >= self.time_limit {
                self.stopped = true;
            }
        }
        self.stopped
    }

    /// Leaf score, clamped so a Nexus always dominates.
    #[inline]
    fn leaf(board: &Board, color: Color) -> i32 {
        evaluate(board, color).clamp(-(WIN - 1), WIN - 1)
    }

    /// Minimax with alpha-beta pruning. `color` is the root player;
    /// `maximizing` tells whose turn it is on `board`.
    fn alpha_beta(
        &mut self,
        board: &Board,
        color: Color,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
    ) -> i32 {
        self.nodes += 1;
        if self.nodes % TIME_CHECK_INTERVAL == 0 && self.check_time() {
            return 0;
        }

        let opponent = color.opponent();
        if has_nexus(board, color) {
            return WIN;
        }
        if has_nexus(board, opponent) {
            return -WIN;
        }
        if depth == 0 {
            return Self::leaf(board, color);
        }

        let mover = if maximizing { color } else { opponent };
        let moves = legal_moves(board, mover);
        if moves.is_empty() {
            return Self::leaf(board, color);
        }

        if maximizing {
            let mut best = -INF;
            for mov in order_moves(board, &moves, mover) {
                let child = simulate_move(board, mov, mover);
                let score = self.alpha_beta(&child, color, depth - 1, alpha, beta, false);
                if self.stopped {
                    return 0;
                }
                best = best.max(score);
                alpha = alpha.max(score);
                if beta <= alpha {
                    break;
                }
            }
            best
        } else {
            let mut best = INF;
            for mov in order_moves(board, &moves, mover) {
                let child = simulate_move(board, mov, mover);
                let score = self.alpha_beta(&child, color, depth - 1, alpha, beta, true);
                if self.stopped {
                    return 0;
                }
                best = best.min(score);
                beta = beta.min(score);
                if beta <= alpha {
                    break;
                }
            }
            best
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Piece;

    fn long() -> Duration {
        Duration::from_secs(30)
    }

    #[test]
    fn test_target_depth() {
        assert_eq!(target_depth(0), 3);
        assert_eq!(target_depth(19), 3);
        assert_eq!(target_depth(20), 2);
        assert_eq!(target_depth(34), 2);
        assert_eq!(target_depth(35), 1);
    }

    #[test]
    fn test_quick_score() {
        let board = Board::from_diagram(&[
            ". . . . . . . .",
            ". . . . . . . .",
            ". . . . . . . .",
            ". w w w . . . .",
            ". . . . . . . .",
            ". . . . . . . .",
            ". . . . . . . .",
            ". . . . . . . .",
        ])
        .unwrap();
        // (3,4): one vector, touches own, distance 1
        assert_eq!(quick_score(&board, Pos::new(3, 4), Color::White), 100 + 50 - 5);
        // Same cell for black blocks one vector
        assert_eq!(quick_score(&board, Pos::new(3, 4), Color::Black), 80 - 5);
    }

    #[test]
    fn test_order_moves_stable() {
        let board = Board::new();
        let moves = legal_moves(&board, Color::White);
        let ordered = order_moves(&board, &moves, Color::White);
        assert_eq!(&ordered[..4], &[Pos::new(3, 3), Pos::new(3, 4), Pos::new(4, 3), Pos::new(4, 4)]);
    }

    #[test]
    fn test_search_finds_nexus() {
        let board = Board::from_diagram(&[
            "b W W W . . . .",
            ". . . . w . . .",
            ". . . . w . . .",
            ". . . . w . . .",
            ". . . . . . . .",
            ". . . . . . . .",
            ". . . . . . . .",
            ". . . . . . . .",
        ])
        .unwrap();
        let mut searcher = Searcher::new(long());
        let result = searcher.search_depth(&board, Color::White, 1);
        assert_eq!(result.best_move, Some(Pos::new(0, 4)));
        assert_eq!(result.score, WIN);
        assert_eq!(result.depth, 1);
    }

    #[test]
    fn test_search_blocks_opponent_nexus() {
        // Black threatens (0,4); white must take it
        let board = Board::from_diagram(&[
            "w B B B . . . .",
            ". . . . b . . .",
            ". . . . b . . .",
            ". . . . b . . .",
            ". . . . . . . .",
            ". . . . . . . .",
            ". . . . . . . w",
            ". . . . . . . .",
        ])
        .unwrap();
        let mut searcher = Searcher::new(long());
        let result = searcher.search_depth(&board, Color::White, 1);
        assert_eq!(result.best_move, Some(Pos::new(0, 4)));
        assert!(result.score > -WIN);
    }

    #[test]
    fn test_search_returns_candidate_on_empty_board() {
        let board = Board::new();
        let mut searcher = Searcher::new(long());
        let result = searcher.search_depth(&board, Color::Black, 1);
        assert!(result.best_move.is_some());
        assert_eq!(result.top_candidate, Some(Pos::new(3, 3)));
        assert!(result.nodes > 0);
    }

    #[test]
    fn test_zero_budget_keeps_no_depth() {
        let mut board = Board::new();
        board.place(Pos::new(3, 3), Piece::node(Color::White, 1));
        let mut searcher = Searcher::new(Duration::ZERO);
        let result = searcher.search_depth(&board, Color::White, 3);
        assert_eq!(result.depth, 0);
        assert_eq!(result.best_move, None);
        assert!(result.top_candidate.is_some());
    }

    fn midgame() -> Board {
        Board::from_diagram(&[
            ". . . . . . . .",
            ". b . . w . . .",
            ". . w b . . . .",
            ". w b w b . . .",
            ". . w b w . . .",
            ". . . w b . . .",
            ". . b . . . . .",
            ". . . . . . . .",
        ])
        .unwrap()
    }

    #[test]
    fn test_interrupted_depth_keeps_previous_result() {
        let board = midgame();
        let first = Searcher::new(long()).search_depth(&board, Color::White, 1);
        assert_eq!(first.depth, 1);

        // Enough nodes for depth 1, nowhere near enough for depth 2
        let mut searcher = Searcher::new(long()).with_node_limit(first.nodes + 1);
        let result = searcher.search_depth(&board, Color::White, 3);
        assert_eq!(result.depth, 1);
        assert!(result.depth < 3);
        assert_eq!(result.best_move, first.best_move);
        assert_eq!(result.score, first.score);
        assert!(result.nodes > first.nodes);
    }

    #[test]
    fn test_short_budget_reports_completed_depth() {
        let board = midgame();
        let mut searcher = Searcher::new(Duration::from_millis(5));
        let result = searcher.search_depth(&board, Color::White, 3);
        // Whatever depth was reached, it is a finished one
        assert!(result.depth <= 3);
        if result.depth > 0 {
            assert!(result.best_move.is_some());
        } else {
            assert!(result.best_move.is_none());
        }
    }

    #[test]
    fn test_root_cap() {
        let board = Board::new();
        let mut searcher = Searcher::new(long()).with_root_cap(1);
        let result = searcher.search_depth(&board, Color::White, 1);
        assert_eq!(result.best_move, Some(Pos::new(3, 3)));
    }
}
