//! Main AI Engine dispatching the four difficulty tiers
//!
//! Every tier starts from the legal moves of the side to move and returns
//! `None` only when there are none:
//!
//! 1. **Easy**: 10% random, else block a triple, else play next to own
//!    pieces, else the most central cell
//! 2. **Medium**: tactical ladder, then a positional score
//! 3. **Hard**: tactical ladder, then one-ply lookahead against the
//!    opponent's best reply
//! 4. **Expert**: instant Nexus, Nexus prevention, then iterative-deepening
//!    alpha-beta under a wall-clock budget
//!
//! A failure inside the computation (a panic, or an illegal selection) is
//! caught at the engine boundary and replaced by a uniformly random legal
//! move.
//!
//! # Example
//!
//! ```
//! use flux::{AIEngine, Board, Color, Difficulty, Pos};
//!
//! let mut engine = AIEngine::with_config(Difficulty::Expert, 300).with_seed(42);
//! let mut board = Board::new();
//! board.place_stone(Pos::new(3, 3), Color::White);
//!
//! let result = engine.select_move_with_stats(&board, Color::Black);
//! println!("Best move: {:?}", result.best_move);
//! println!("Search type: {:?}", result.search_type);
//! ```

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::str::FromStr;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::board::{Board, Color, Pos};
use crate::error::EngineError;
use crate::eval::{distance_from_center, is_adjacent_to};
use crate::rules::{is_legal_move, legal_moves};
use crate::search::alphabeta::MAX_ROOT_MOVES;
use crate::search::tactics::{pick, triple_blocks};
use crate::search::{
    best_lookahead, best_positional, instant_win, prevent_nexus, priority_ladder, Searcher, Tactic,
    WIN,
};

/// Default expert time budget
pub const DEFAULT_TIME_LIMIT_MS: u64 = 3000;

/// Chance that the easy tier plays a random move
const EASY_RANDOM_CHANCE: f64 = 0.1;

/// AI strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Expert,
    ];

    /// Map a numeric level `1..=4`; anything else is `Medium`
    pub fn from_level(level: u8) -> Self {
        match level {
            1 => Difficulty::Easy,
            3 => Difficulty::Hard,
            4 => Difficulty::Expert,
            _ => Difficulty::Medium,
        }
    }

    pub fn level(self) -> u8 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
            Difficulty::Expert => 4,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown difficulty {0:?} (expected easy, medium, hard, expert or a number)")]
pub struct ParseDifficultyError(String);

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(level) = s.parse::<u8>() {
            return Ok(Difficulty::from_level(level));
        }
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "expert" => Ok(Difficulty::Expert),
            _ => Err(ParseDifficultyError(s.to_string())),
        }
    }
}

/// Which rule produced the move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchType {
    /// Easy tier's random move
    Random,
    /// Cell extending an opponent triple
    BlockTriple,
    /// Next to an own piece
    Adjacent,
    /// Closest to the center
    Central,
    /// Forms one or more vectors
    FormLine,
    /// Takes a cell where the opponent would form a vector
    BlockLine,
    ExtendTriple,
    BlockPair,
    ExtendPair,
    /// Medium tier's positional score
    Positional,
    /// Hard tier's one-ply lookahead
    Lookahead,
    /// Completes a Nexus
    InstantWin,
    /// Takes the cell where the opponent would complete a Nexus
    PreventNexus,
    /// Expert alpha-beta search
    AlphaBeta,
    /// No search result: pre-scored top move or a random legal move
    Fallback,
}

impl From<Tactic> for SearchType {
    fn from(tactic: Tactic) -> Self {
        match tactic {
            Tactic::FormLine => SearchType::FormLine,
            Tactic::BlockLine => SearchType::BlockLine,
            Tactic::BlockTriple => SearchType::BlockTriple,
            Tactic::ExtendTriple => SearchType::ExtendTriple,
            Tactic::BlockPair => SearchType::BlockPair,
            Tactic::ExtendPair => SearchType::ExtendPair,
        }
    }
}

/// Result of a move selection with statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResult {
    /// Selected move; `None` only when there is no legal move
    pub best_move: Option<Pos>,
    pub search_type: SearchType,
    /// Score of the move under the rule that chose it
    pub score: i32,
    /// Completed search depth (expert only)
    pub depth: u8,
    /// Nodes searched (expert only)
    pub nodes: u64,
    pub time_ms: u64,
}

impl MoveResult {
    #[inline]
    fn found(pos: Pos, search_type: SearchType, score: i32) -> Self {
        Self {
            best_move: Some(pos),
            search_type,
            score,
            depth: 0,
            nodes: 0,
            time_ms: 0,
        }
    }

    #[inline]
    fn no_move() -> Self {
        Self {
            best_move: None,
            search_type: SearchType::Fallback,
            score: 0,
            depth: 0,
            nodes: 0,
            time_ms: 0,
        }
    }
}

/// Main AI Engine for Flux.
///
/// Holds only configuration and its random source; no game state is
/// carried between calls.
#[derive(Clone)]
pub struct AIEngine {
    difficulty: Difficulty,
    /// Wall-clock budget for the expert search
    time_limit: Duration,
    /// Root candidates searched by the expert tier
    max_root_moves: usize,
    rng: StdRng,
}

impl AIEngine {
    /// Engine with the default time budget, seeded from the OS.
    #[must_use]
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_config(difficulty, DEFAULT_TIME_LIMIT_MS)
    }

    /// Engine with a custom expert time budget in milliseconds.
    #[must_use]
    pub fn with_config(difficulty: Difficulty, time_limit_ms: u64) -> Self {
        Self {
            difficulty,
            time_limit: Duration::from_millis(time_limit_ms),
            max_root_moves: MAX_ROOT_MOVES,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reseed the random source for reproducible play
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    #[must_use]
    pub fn with_root_cap(mut self, cap: usize) -> Self {
        self.max_root_moves = cap.max(1);
        self
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    pub fn set_time_limit(&mut self, time_ms: u64) {
        self.time_limit = Duration::from_millis(time_ms);
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }

    /// Select a move for `color`. Never returns an illegal move.
    #[must_use]
    pub fn select_move(&mut self, board: &Board, color: Color) -> Option<Pos> {
        self.select_move_with_stats(board, color).best_move
    }

    /// Select a move, recovering from any engine failure with a random
    /// legal move.
    #[must_use]
    pub fn select_move_with_stats(&mut self, board: &Board, color: Color) -> MoveResult {
        let start = Instant::now();
        let mut result = match self.try_select_move_with_stats(board, color) {
            Ok(result) => result,
            Err(err) => {
                warn!(%err, %color, difficulty = %self.difficulty, "AI failed, playing a random move");
                self.fallback_move(board, color)
            }
        };
        result.time_ms = start.elapsed().as_millis() as u64;
        result
    }

    /// Select a move without the random fallback.
    pub fn try_select_move(&mut self, board: &Board, color: Color) -> Result<Option<Pos>, EngineError> {
        self.try_select_move_with_stats(board, color)
            .map(|result| result.best_move)
    }

    /// Run the tier, reporting a panic or an illegal selection as an error.
    pub fn try_select_move_with_stats(
        &mut self,
        board: &Board,
        color: Color,
    ) -> Result<MoveResult, EngineError> {
        let start = Instant::now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.compute(board, color)));
        let mut result = outcome.map_err(|payload| {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            EngineError::Panicked(message)
        })?;

        if let Some(pos) = result.best_move {
            if !is_legal_move(board, pos, color) {
                return Err(EngineError::IllegalSelection(pos));
            }
        }
        result.time_ms = start.elapsed().as_millis() as u64;
        Ok(result)
    }

    /// Uniformly random legal move from the engine's own random source
    pub fn fallback_move(&mut self, board: &Board, color: Color) -> MoveResult {
        match random_legal_move(board, color, &mut self.rng) {
            Some(pos) => MoveResult::found(pos, SearchType::Fallback, 0),
            None => MoveResult::no_move(),
        }
    }

    fn compute(&mut self, board: &Board, color: Color) -> MoveResult {
        let legal = legal_moves(board, color);
        if legal.is_empty() {
            debug!(%color, "no legal moves");
            return MoveResult::no_move();
        }

        let result = match self.difficulty {
            Difficulty::Easy => self.easy(board, color, &legal),
            Difficulty::Medium => self.medium(board, color, &legal),
            Difficulty::Hard => self.hard(board, color, &legal),
            Difficulty::Expert => self.expert(board, color, &legal),
        };
        debug!(
            difficulty = %self.difficulty,
            %color,
            best_move = ?result.best_move,
            search_type = ?result.search_type,
            score = result.score,
            "AI move"
        );
        result
    }

    fn easy(&mut self, board: &Board, color: Color, legal: &[Pos]) -> MoveResult {
        if self.rng.random_bool(EASY_RANDOM_CHANCE) {
            if let Some(pos) = pick(&mut self.rng, legal) {
                return MoveResult::found(pos, SearchType::Random, 0);
            }
        }

        let blocks = triple_blocks(board, color, legal);
        if let Some(pos) = pick(&mut self.rng, &blocks) {
            return MoveResult::found(pos, SearchType::BlockTriple, 0);
        }

        let adjacent: Vec<Pos> = legal
            .iter()
            .copied()
            .filter(|&pos| is_adjacent_to(board, pos, color))
            .collect();
        if let Some(pos) = pick(&mut self.rng, &adjacent) {
            return MoveResult::found(pos, SearchType::Adjacent, 0);
        }

        // First minimum in scan order
        let central = legal.iter().copied().reduce(|best, pos| {
            if distance_from_center(pos) < distance_from_center(best) {
                pos
            } else {
                best
            }
        });
        match central {
            Some(pos) => MoveResult::found(pos, SearchType::Central, -distance_from_center(pos)),
            None => MoveResult::no_move(),
        }
    }

    fn medium(&mut self, board: &Board, color: Color, legal: &[Pos]) -> MoveResult {
        if let Some(tm) = priority_ladder(board, color, legal, &mut self.rng) {
            return MoveResult::found(tm.pos, tm.tactic.into(), 0);
        }
        match best_positional(board, color, legal) {
            Some((pos, score)) => MoveResult::found(pos, SearchType::Positional, score),
            None => MoveResult::no_move(),
        }
    }

    fn hard(&mut self, board: &Board, color: Color, legal: &[Pos]) -> MoveResult {
        if let Some(tm) = priority_ladder(board, color, legal, &mut self.rng) {
            return MoveResult::found(tm.pos, tm.tactic.into(), 0);
        }
        match best_lookahead(board, color, legal) {
            Some((pos, score)) => MoveResult::found(pos, SearchType::Lookahead, score),
            None => MoveResult::no_move(),
        }
    }

    fn expert(&mut self, board: &Board, color: Color, legal: &[Pos]) -> MoveResult {
        if let Some(pos) = instant_win(board, color, legal) {
            return MoveResult::found(pos, SearchType::InstantWin, WIN);
        }
        if let Some(pos) = prevent_nexus(board, color, legal) {
            return MoveResult::found(pos, SearchType::PreventNexus, 0);
        }

        let mut searcher = Searcher::new(self.time_limit).with_root_cap(self.max_root_moves);
        let search = searcher.search(board, color);

        if let Some(pos) = search.best_move {
            return MoveResult {
                best_move: Some(pos),
                search_type: SearchType::AlphaBeta,
                score: search.score,
                depth: search.depth,
                nodes: search.nodes,
                time_ms: 0,
            };
        }

        debug!(nodes = search.nodes, "no depth completed, using top pre-scored move");
        let pos = search.top_candidate.or_else(|| pick(&mut self.rng, legal));
        match pos {
            Some(pos) => MoveResult {
                nodes: search.nodes,
                ..MoveResult::found(pos, SearchType::Fallback, 0)
            },
            None => MoveResult::no_move(),
        }
    }
}

impl Default for AIEngine {
    fn default() -> Self {
        Self::new(Difficulty::default())
    }
}

impl fmt::Debug for AIEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AIEngine")
            .field("difficulty", &self.difficulty)
            .field("time_limit", &self.time_limit)
            .field("max_root_moves", &self.max_root_moves)
            .finish_non_exhaustive()
    }
}

/// Random legal move for `color`, used by callers that drive their own fallback
pub fn random_legal_move<R: Rng + ?Sized>(board: &Board, color: Color, rng: &mut R) -> Option<Pos> {
    pick(rng, &legal_moves(board, color))
}
