//! Local play driver: hotseat or one human against the AI

use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::{GameOutcome, GameSession, MoveOutcome};
use crate::board::{Color, Pos};
use crate::engine::{AIEngine, Difficulty, MoveResult};
use crate::error::IllegalMove;

/// Who sits at the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    /// Two humans share the board
    Hotseat,
    /// Player vs AI
    VersusAi { human: Color, difficulty: Difficulty },
}

impl Default for GameMode {
    fn default() -> Self {
        GameMode::VersusAi {
            human: Color::White,
            difficulty: Difficulty::default(),
        }
    }
}

/// AI computation state
pub enum AiState {
    Idle,
    Thinking {
        receiver: Receiver<(AIEngine, MoveResult)>,
        start_time: Instant,
    },
}

/// A local game and, in AI mode, the engine that plays one side
pub struct LocalGame {
    session: GameSession,
    mode: GameMode,
    /// Configured engine; a thinking thread works on a clone
    engine: AIEngine,
    ai_state: AiState,
    last_ai_result: Option<MoveResult>,
}

impl LocalGame {
    pub fn new(mode: GameMode) -> Self {
        let difficulty = match mode {
            GameMode::VersusAi { difficulty, .. } => difficulty,
            GameMode::Hotseat => Difficulty::default(),
        };
        Self::with_engine(mode, AIEngine::new(difficulty))
    }

    /// Use a preconfigured engine (seeded, custom budget)
    pub fn with_engine(mode: GameMode, engine: AIEngine) -> Self {
        Self {
            session: GameSession::new(),
            mode,
            engine,
            ai_state: AiState::Idle,
            last_ai_result: None,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn last_ai_result(&self) -> Option<&MoveResult> {
        self.last_ai_result.as_ref()
    }

    /// Color the AI plays, if any
    pub fn ai_color(&self) -> Option<Color> {
        match self.mode {
            GameMode::VersusAi { human, .. } => Some(human.opponent()),
            GameMode::Hotseat => None,
        }
    }

    pub fn is_human_turn(&self) -> bool {
        self.ai_color() != Some(self.session.current_player())
    }

    pub fn is_ai_turn(&self) -> bool {
        !self.session.is_game_over() && self.ai_color() == Some(self.session.current_player())
    }

    pub fn is_ai_thinking(&self) -> bool {
        matches!(self.ai_state, AiState::Thinking { .. })
    }

    pub fn ai_thinking_elapsed(&self) -> Option<Duration> {
        match &self.ai_state {
            AiState::Thinking { start_time, .. } => Some(start_time.elapsed()),
            AiState::Idle => None,
        }
    }

    /// Place a piece for the human to move
    pub fn human_move(&mut self, row: i32, col: i32) -> Result<MoveOutcome, IllegalMove> {
        if self.session.is_game_over() {
            return Err(IllegalMove::GameOver);
        }
        if !self.is_human_turn() || self.is_ai_thinking() {
            let expected = self.session.current_player();
            return Err(IllegalMove::NotYourTurn {
                expected,
                requested: expected.opponent(),
            });
        }
        self.session.apply_move(row, col)
    }

    /// The human resigns; in hotseat the side to move resigns
    pub fn resign(&mut self) -> Result<GameOutcome, IllegalMove> {
        let color = match self.mode {
            GameMode::VersusAi { human, .. } => human,
            GameMode::Hotseat => self.session.current_player(),
        };
        self.session.resign(color)
    }

    /// Hint for the side to move, from the same engine the AI plays with
    pub fn suggest(&mut self) -> Option<Pos> {
        if self.session.is_game_over() {
            return None;
        }
        let color = self.session.current_player();
        self.engine.select_move(self.session.board(), color)
    }

    /// Let the AI move now, blocking until it has chosen
    pub fn play_ai_turn(&mut self) -> Result<MoveOutcome, IllegalMove> {
        self.ensure_ai_turn()?;
        let color = self.session.current_player();
        let result = self.engine.select_move_with_stats(self.session.board(), color);
        self.apply_ai_result(result)
    }

    /// Start the AI on a background thread. Poll with [`Self::poll_ai`].
    pub fn start_ai_thinking(&mut self) {
        if !self.is_ai_turn() || self.is_ai_thinking() {
            return;
        }
        let mut engine = self.engine.clone();
        let board = self.session.board().clone();
        let color = self.session.current_player();
        let (tx, rx) = channel();

        thread::spawn(move || {
            let result = engine.select_move_with_stats(&board, color);
            let _ = tx.send((engine, result));
        });

        self.ai_state = AiState::Thinking {
            receiver: rx,
            start_time: Instant::now(),
        };
    }

    /// Apply the AI's move once it is ready. `None` while still thinking
    /// or when idle.
    ///
    /// If the thinking thread died without answering, the turn is resolved
    /// with a random legal move from the configured engine.
    pub fn poll_ai(&mut self) -> Option<Result<MoveOutcome, IllegalMove>> {
        let received = match &self.ai_state {
            AiState::Thinking { receiver, .. } => match receiver.try_recv() {
                Ok((engine, result)) => Some((engine, result)),
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => None,
            },
            AiState::Idle => return None,
        };
        let elapsed = self.ai_thinking_elapsed().unwrap_or_default();
        self.ai_state = AiState::Idle;

        let result = match received {
            Some((engine, result)) => {
                // Keep the thread's engine so its random stream carries on
                self.engine = engine;
                result
            }
            None => {
                let color = self.session.current_player();
                warn!(%color, "AI thread exited without a result, playing a random move");
                self.engine.fallback_move(self.session.board(), color)
            }
        };
        debug!(elapsed_ms = elapsed.as_millis() as u64, "AI thinking finished");
        Some(self.apply_ai_result(result))
    }

    fn ensure_ai_turn(&self) -> Result<(), IllegalMove> {
        if self.session.is_game_over() {
            return Err(IllegalMove::GameOver);
        }
        if !self.is_ai_turn() || self.is_ai_thinking() {
            let expected = self.session.current_player();
            return Err(IllegalMove::NotYourTurn {
                expected,
                requested: expected.opponent(),
            });
        }
        Ok(())
    }

    fn apply_ai_result(&mut self, result: MoveResult) -> Result<MoveOutcome, IllegalMove> {
        debug!(
            search_type = ?result.search_type,
            score = result.score,
            depth = result.depth,
            time_ms = result.time_ms,
            "AI move ready"
        );
        let best = result.best_move;
        self.last_ai_result = Some(result);
        // An unfinished game always has a legal move, and the engine falls back to one
        let pos = best.ok_or(IllegalMove::GameOver)?;
        self.session.apply_move(pos.row as i32, pos.col as i32)
    }
}

impl Default for LocalGame {
    fn default() -> Self {
        Self::new(GameMode::default())
    }
}
