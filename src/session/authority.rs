//! Networked play: one authoritative session, many projections
//!
//! The [`Authority`] is the only writer. It checks turn ownership, hands
//! the move to [`GameSession::apply_move`], and produces a [`GameUpdate`]
//! for broadcast. A [`Projection`] is a client replica that is overwritten
//! by every update it receives and never resolves anything on its own.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::{GameOutcome, GameSession, MoveRecord, Snapshot, TimeControl};
use crate::board::{Board, Color, Pos};
use crate::error::{IllegalMove, SessionError};
use crate::rules::{is_legal_move, legal_moves};

/// State change sent to both seats
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameUpdate {
    /// The accepted move; `None` for resignation, departure or timeout
    #[serde(rename = "move")]
    pub mv: Option<MoveRecord>,
    pub state: Snapshot,
    pub game_over: bool,
    pub outcome: Option<GameOutcome>,
}

/// Server-side owner of a game and its two seats
#[derive(Debug, Clone)]
pub struct Authority<P> {
    session: GameSession,
    white: P,
    black: P,
}

impl<P: PartialEq> Authority<P> {
    /// Seat two players. The first to join plays white.
    pub fn new(first: P, second: P) -> Self {
        Self::with_session(first, second, GameSession::new())
    }

    pub fn with_time_control(first: P, second: P, control: TimeControl) -> Self {
        Self::with_session(first, second, GameSession::with_time_control(control))
    }

    fn with_session(white: P, black: P, session: GameSession) -> Self {
        Self {
            session,
            white,
            black,
        }
    }

    /// Seat color of `player`, if seated
    pub fn seat(&self, player: &P) -> Option<Color> {
        if *player == self.white {
            Some(Color::White)
        } else if *player == self.black {
            Some(Color::Black)
        } else {
            None
        }
    }

    pub fn player(&self, color: Color) -> &P {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Current authoritative state
    pub fn snapshot(&self) -> Snapshot {
        self.session.snapshot()
    }

    /// Accept a move from `player` if it is their turn and the move is legal
    #[instrument(level = "debug", skip(self, player))]
    pub fn submit_move(&mut self, player: &P, row: i32, col: i32) -> Result<GameUpdate, SessionError> {
        let color = self.seat(player).ok_or_else(|| {
            warn!("move from unseated player rejected");
            SessionError::UnknownPlayer
        })?;
        let expected = self.session.current_player();
        if color != expected && !self.session.is_game_over() {
            warn!(%expected, requested = %color, "out-of-turn move rejected");
            return Err(IllegalMove::NotYourTurn {
                expected,
                requested: color,
            }
            .into());
        }

        let applied = self.session.apply_move(row, col).inspect_err(|err| {
            warn!(%color, row, col, %err, "move rejected");
        })?;

        info!(
            %color,
            notation = %applied.record.notation,
            game_over = self.session.is_game_over(),
            "broadcasting update"
        );
        Ok(self.update(Some(applied.record)))
    }

    /// `player` resigns
    pub fn terminate(&mut self, player: &P) -> Result<GameUpdate, SessionError> {
        let color = self.seat(player).ok_or(SessionError::UnknownPlayer)?;
        self.session.resign(color)?;
        info!(%color, "resignation, broadcasting final state");
        Ok(self.update(None))
    }

    /// `player` disconnected or left the room
    pub fn leave(&mut self, player: &P) -> Result<GameUpdate, SessionError> {
        let color = self.seat(player).ok_or(SessionError::UnknownPlayer)?;
        self.session.abandon(color)?;
        info!(%color, "player left, broadcasting final state");
        Ok(self.update(None))
    }

    /// Charge `elapsed` to the side to move. Returns the final update if
    /// its flag fell.
    pub fn tick(&mut self, elapsed: Duration) -> Option<GameUpdate> {
        let outcome = self.session.tick(elapsed)?;
        info!(reason = ?outcome.reason, "flag fell, broadcasting final state");
        Some(self.update(None))
    }

    fn update(&self, mv: Option<MoveRecord>) -> GameUpdate {
        GameUpdate {
            mv,
            state: self.session.snapshot(),
            game_over: self.session.is_game_over(),
            outcome: self.session.outcome().copied(),
        }
    }
}

/// Client replica of an authoritative game
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    state: Snapshot,
    outcome: Option<GameOutcome>,
}

impl Projection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite with the authority's state, whatever we held before
    pub fn apply(&mut self, update: &GameUpdate) {
        self.state = update.state.clone();
        self.outcome = update.outcome;
    }

    /// Overwrite with a bare snapshot (join, resync, termination)
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) {
        if !snapshot.game_over {
            self.outcome = None;
        }
        self.state = snapshot;
    }

    pub fn state(&self) -> &Snapshot {
        &self.state
    }

    pub fn board(&self) -> &Board {
        &self.state.board
    }

    pub fn current_player(&self) -> Color {
        self.state.current_player
    }

    pub fn is_game_over(&self) -> bool {
        self.state.game_over
    }

    pub fn outcome(&self) -> Option<&GameOutcome> {
        self.outcome.as_ref()
    }

    /// Hinting only; the authority has the final word
    pub fn legal_moves(&self) -> Vec<Pos> {
        if self.state.game_over {
            return Vec::new();
        }
        legal_moves(&self.state.board, self.state.current_player)
    }

    pub fn is_legal_move(&self, row: i32, col: i32) -> bool {
        !self.state.game_over
            && Pos::try_new(row, col)
                .is_some_and(|pos| is_legal_move(&self.state.board, pos, self.state.current_player))
    }
}
