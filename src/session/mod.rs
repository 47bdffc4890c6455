//! Game session: the single owner and sole mutator of a game's state
//!
//! [`GameSession::apply_move`] is the only way a placement reaches the
//! board. It either fully succeeds or fully rejects; on rejection nothing
//! changes. Game-ending conditions (Nexus, node-count tiebreak,
//! resignation, abandonment, clock timeout) set `game_over` exactly once.

pub mod authority;
pub mod clock;
pub mod local;
pub mod snapshot;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::board::{Board, Color, Pos, LINE_LENGTH};
use crate::error::{IllegalMove, SessionError, SnapshotError};
use crate::rules::{
    check_nexus, check_placement, execute_lines, has_legal_move, is_legal_move, legal_moves,
    node_tally, Vector,
};

pub use authority::{Authority, GameUpdate, Projection};
pub use clock::{GameClock, TimeControl};
pub use local::{GameMode, LocalGame};
pub use snapshot::Snapshot;

/// Why the game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EndReason {
    /// Four nodes in a row
    Nexus { positions: [Pos; LINE_LENGTH] },
    /// Side to move had no legal placement; node counts decided
    NodeCount { white: u32, black: u32 },
    Resignation { by: Color },
    Timeout { flagged: Color },
    /// A player left; no winner
    Abandoned { by: Color },
}

/// Final result. `winner == None` is a draw or an abandoned game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub winner: Option<Color>,
    pub reason: EndReason,
}

/// One successful placement, as kept in the move log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRecord {
    pub color: Color,
    pub pos: Pos,
    /// Cell label with `N` / `N<k>` when the move created a node
    pub notation: String,
    pub lines_formed: u8,
    pub vectors: Vec<Vector>,
}

impl MoveRecord {
    fn new(color: Color, pos: Pos, lines_formed: u8, vectors: Vec<Vector>) -> Self {
        let notation = match lines_formed {
            0 => pos.notation(),
            1 => format!("{}N", pos.notation()),
            k => format!("{}N{k}", pos.notation()),
        };
        Self {
            color,
            pos,
            notation,
            lines_formed,
            vectors,
        }
    }

    /// The placed cell if it became a node
    #[inline]
    pub fn node(&self) -> Option<Pos> {
        (self.lines_formed > 0).then_some(self.pos)
    }
}

/// What `apply_move` reports back for animation and broadcasting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveOutcome {
    pub record: MoveRecord,
    /// Cells cleared by the vectors, in detection order
    pub removed: Vec<Pos>,
    /// Set when this move ended the game
    pub outcome: Option<GameOutcome>,
}

impl MoveOutcome {
    #[inline]
    pub fn lines_formed(&self) -> u8 {
        self.record.lines_formed
    }

    #[inline]
    pub fn vectors(&self) -> &[Vector] {
        &self.record.vectors
    }
}

/// A Flux game in progress
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    current_player: Color,
    white_score: u32,
    black_score: u32,
    move_count: u32,
    last_move: Option<Pos>,
    game_over: bool,
    outcome: Option<GameOutcome>,
    /// State before each successful placement
    move_history: Vec<Snapshot>,
    move_log: Vec<MoveRecord>,
    clock: Option<GameClock>,
}

impl GameSession {
    /// New game, white to move, no clock
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            current_player: Color::White,
            white_score: 0,
            black_score: 0,
            move_count: 0,
            last_move: None,
            game_over: false,
            outcome: None,
            move_history: Vec::new(),
            move_log: Vec::new(),
            clock: None,
        }
    }

    /// New game with a clock
    pub fn with_time_control(control: TimeControl) -> Self {
        Self {
            clock: Some(GameClock::new(control)),
            ..Self::new()
        }
    }

    /// Resume from a validated snapshot. History and log start empty.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, SnapshotError> {
        snapshot.validate()?;
        let mut session = Self {
            board: snapshot.board,
            current_player: snapshot.current_player,
            white_score: snapshot.white_score,
            black_score: snapshot.black_score,
            move_count: snapshot.move_count,
            last_move: snapshot.last_move,
            game_over: snapshot.game_over,
            ..Self::new()
        };
        if session.game_over {
            session.outcome = session.board_outcome();
        } else if let Some(outcome) = session.board_outcome() {
            // Nothing left to play: close the game instead of resuming it
            session.finish(outcome);
        }
        Ok(session)
    }

    // Accessors

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn current_player(&self) -> Color {
        self.current_player
    }

    #[inline]
    pub fn score(&self, color: Color) -> u32 {
        match color {
            Color::White => self.white_score,
            Color::Black => self.black_score,
        }
    }

    #[inline]
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    #[inline]
    pub fn last_move(&self) -> Option<Pos> {
        self.last_move
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    #[inline]
    pub fn outcome(&self) -> Option<&GameOutcome> {
        self.outcome.as_ref()
    }

    pub fn winner(&self) -> Option<Color> {
        self.outcome.and_then(|o| o.winner)
    }

    pub fn move_history(&self) -> &[Snapshot] {
        &self.move_history
    }

    pub fn move_log(&self) -> &[MoveRecord] {
        &self.move_log
    }

    pub fn clock(&self) -> Option<&GameClock> {
        self.clock.as_ref()
    }

    /// Legal moves for the side to move; empty once the game is over
    pub fn legal_moves(&self) -> Vec<Pos> {
        if self.game_over {
            return Vec::new();
        }
        legal_moves(&self.board, self.current_player)
    }

    /// Whether the side to move may play at `(row, col)`
    pub fn is_legal_move(&self, row: i32, col: i32) -> bool {
        !self.game_over
            && Pos::try_new(row, col).is_some_and(|pos| is_legal_move(&self.board, pos, self.current_player))
    }

    /// Current state in wire shape
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board.clone(),
            current_player: self.current_player,
            white_score: self.white_score,
            black_score: self.black_score,
            move_count: self.move_count,
            last_move: self.last_move,
            game_over: self.game_over,
        }
    }

    /// Place a piece for the side to move.
    ///
    /// Validation runs before any state is touched, so a rejected move
    /// leaves the session exactly as it was.
    #[instrument(level = "debug", skip(self), fields(player = %self.current_player))]
    pub fn apply_move(&mut self, row: i32, col: i32) -> Result<MoveOutcome, IllegalMove> {
        if self.game_over {
            return Err(IllegalMove::GameOver);
        }
        let pos = Pos::try_new(row, col).ok_or(IllegalMove::OutOfBounds { row, col })?;
        let color = self.current_player;
        check_placement(&self.board, pos, color)?;

        self.move_history.push(self.snapshot());

        self.board.place_stone(pos, color);
        self.move_count += 1;
        self.last_move = Some(pos);

        let lines = execute_lines(&mut self.board, pos, color);
        if lines.formed_any() {
            match color {
                Color::White => self.white_score += u32::from(lines.lines_formed),
                Color::Black => self.black_score += u32::from(lines.lines_formed),
            }
        }
        if let Some(clock) = self.clock.as_mut() {
            clock.add_increment(color);
        }

        self.current_player = color.opponent();

        let record = MoveRecord::new(color, pos, lines.lines_formed, lines.vectors);
        debug!(
            notation = %record.notation,
            lines = lines.lines_formed,
            removed = lines.pieces_to_remove.len(),
            "move applied"
        );
        self.move_log.push(record.clone());

        if let Some(nexus) = check_nexus(&self.board) {
            self.finish(GameOutcome {
                winner: Some(nexus.winner),
                reason: EndReason::Nexus {
                    positions: nexus.positions,
                },
            });
        } else if !has_legal_move(&self.board, self.current_player) {
            let tally = node_tally(&self.board);
            self.finish(GameOutcome {
                winner: tally.winner(),
                reason: EndReason::NodeCount {
                    white: tally.white,
                    black: tally.black,
                },
            });
        }

        Ok(MoveOutcome {
            record,
            removed: lines.pieces_to_remove,
            outcome: self.outcome.filter(|_| self.game_over),
        })
    }

    /// `color` resigns; the opponent wins
    pub fn resign(&mut self, color: Color) -> Result<GameOutcome, IllegalMove> {
        self.end(GameOutcome {
            winner: Some(color.opponent()),
            reason: EndReason::Resignation { by: color },
        })
    }

    /// `color` left the game; nobody wins
    pub fn abandon(&mut self, color: Color) -> Result<GameOutcome, IllegalMove> {
        self.end(GameOutcome {
            winner: None,
            reason: EndReason::Abandoned { by: color },
        })
    }

    /// Charge `elapsed` to the side to move. Returns the outcome if this
    /// ran its clock out. Does nothing without a clock or after the game.
    pub fn tick(&mut self, elapsed: Duration) -> Option<GameOutcome> {
        if self.game_over {
            return None;
        }
        let mover = self.current_player;
        let flagged = self.clock.as_mut()?.charge(mover, elapsed);
        if !flagged {
            return None;
        }
        let outcome = GameOutcome {
            winner: Some(mover.opponent()),
            reason: EndReason::Timeout { flagged: mover },
        };
        self.finish(outcome);
        Some(outcome)
    }

    /// Position before ply `index`; `index == history length` is the
    /// current position.
    pub fn review(&self, index: usize) -> Result<Snapshot, SessionError> {
        let len = self.move_history.len();
        match index.cmp(&len) {
            std::cmp::Ordering::Less => Ok(self.move_history[index].clone()),
            std::cmp::Ordering::Equal => Ok(self.snapshot()),
            std::cmp::Ordering::Greater => Err(SessionError::ReviewOutOfRange { index, len }),
        }
    }

    fn end(&mut self, outcome: GameOutcome) -> Result<GameOutcome, IllegalMove> {
        if self.game_over {
            return Err(IllegalMove::GameOver);
        }
        self.finish(outcome);
        Ok(outcome)
    }

    fn finish(&mut self, outcome: GameOutcome) {
        debug_assert!(!self.game_over);
        self.game_over = true;
        self.outcome = Some(outcome);
        info!(
            winner = ?outcome.winner,
            reason = ?outcome.reason,
            moves = self.move_count,
            "game over"
        );
    }

    /// Outcome implied by the board alone, checked when resuming a snapshot
    fn board_outcome(&self) -> Option<GameOutcome> {
        if let Some(nexus) = check_nexus(&self.board) {
            return Some(GameOutcome {
                winner: Some(nexus.winner),
                reason: EndReason::Nexus {
                    positions: nexus.positions,
                },
            });
        }
        if !has_legal_move(&self.board, self.current_player) {
            let tally = node_tally(&self.board);
            return Some(GameOutcome {
                winner: tally.winner(),
                reason: EndReason::NodeCount {
                    white: tally.white,
                    black: tally.black,
                },
            });
        }
        None
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Piece;

    fn play(session: &mut GameSession, moves: &[(i32, i32)]) {
        for &(r, c) in moves {
            session.apply_move(r, c).unwrap();
        }
    }

    #[test]
    fn test_new_session() {
        let session = GameSession::new();
        assert_eq!(session.current_player(), Color::White);
        assert_eq!(session.move_count(), 0);
        assert!(!session.is_game_over());
        assert_eq!(session.legal_moves().len(), 64);
        assert_eq!(session.snapshot(), Snapshot::initial());
    }

    #[test]
    fn test_apply_move_basics() {
        let mut session = GameSession::new();
        let outcome = session.apply_move(3, 3).unwrap();
        assert_eq!(outcome.lines_formed(), 0);
        assert_eq!(outcome.record.notation, "D5");
        assert_eq!(session.current_player(), Color::Black);
        assert_eq!(session.last_move(), Some(Pos::new(3, 3)));
        assert_eq!(session.move_history().len(), 1);
        assert_eq!(session.move_history()[0], Snapshot::initial());
    }

    #[test]
    fn test_rejections_leave_state_untouched() {
        let mut session = GameSession::new();
        play(&mut session, &[(0, 0)]);
        let before = session.snapshot();
        let history = session.move_history().len();

        assert_eq!(
            session.apply_move(0, 0),
            Err(IllegalMove::Occupied(Pos::new(0, 0)))
        );
        assert_eq!(
            session.apply_move(8, 2),
            Err(IllegalMove::OutOfBounds { row: 8, col: 2 })
        );
        assert_eq!(
            session.apply_move(-1, 0),
            Err(IllegalMove::OutOfBounds { row: -1, col: 0 })
        );
        assert_eq!(session.snapshot(), before);
        assert_eq!(session.move_history().len(), history);
    }

    #[test]
    fn test_line_formation_scores() {
        let mut session = GameSession::new();
        // White builds row 0, black plays row 7
        play(&mut session, &[(0, 0), (7, 0), (0, 1), (7, 2), (0, 2), (7, 4)]);
        let outcome = session.apply_move(0, 3).unwrap();

        assert_eq!(outcome.lines_formed(), 1);
        assert_eq!(outcome.record.notation, "D8N");
        assert_eq!(outcome.record.node(), Some(Pos::new(0, 3)));
        assert_eq!(outcome.removed, vec![Pos::new(0, 0), Pos::new(0, 1), Pos::new(0, 2)]);
        assert_eq!(session.score(Color::White), 1);
        assert_eq!(session.board().get(Pos::new(0, 3)), Some(Piece::node(Color::White, 1)));
        assert!(session.board().is_empty(Pos::new(0, 0)));
    }

    #[test]
    fn test_double_line_notation() {
        let mut session = GameSession::new();
        play(
            &mut session,
            &[(3, 0), (7, 7), (3, 1), (7, 5), (3, 2), (7, 3), (4, 3), (7, 1), (5, 3), (6, 6), (6, 3), (0, 7)],
        );
        let outcome = session.apply_move(3, 3).unwrap();
        assert_eq!(outcome.lines_formed(), 2);
        assert_eq!(outcome.record.notation, "D5N2");
        assert_eq!(session.score(Color::White), 2);
    }

    #[test]
    fn test_game_over_rejects_everything() {
        let mut session = GameSession::new();
        session.resign(Color::Black).unwrap();
        assert!(session.is_game_over());
        assert_eq!(session.winner(), Some(Color::White));
        assert_eq!(session.apply_move(3, 3), Err(IllegalMove::GameOver));
        assert_eq!(session.resign(Color::White), Err(IllegalMove::GameOver));
        assert_eq!(session.abandon(Color::White), Err(IllegalMove::GameOver));
        assert!(session.legal_moves().is_empty());
        assert!(!session.is_legal_move(3, 3));
    }

    #[test]
    fn test_abandon_has_no_winner() {
        let mut session = GameSession::new();
        let outcome = session.abandon(Color::White).unwrap();
        assert_eq!(outcome.winner, None);
        assert_eq!(outcome.reason, EndReason::Abandoned { by: Color::White });
    }

    #[test]
    fn test_clock_timeout() {
        let mut session = GameSession::with_time_control(TimeControl::new(
            Duration::from_secs(10),
            Duration::from_secs(1),
        ));
        assert_eq!(session.tick(Duration::from_secs(3)), None);
        session.apply_move(3, 3).unwrap();
        // White: 10 - 3 + 1
        assert_eq!(
            session.clock().unwrap().remaining(Color::White),
            Duration::from_secs(8)
        );

        let outcome = session.tick(Duration::from_secs(11)).unwrap();
        assert_eq!(outcome.winner, Some(Color::White));
        assert_eq!(outcome.reason, EndReason::Timeout { flagged: Color::Black });
        assert!(session.is_game_over());
        assert_eq!(session.tick(Duration::from_secs(1)), None);
    }

    #[test]
    fn test_tick_without_clock() {
        let mut session = GameSession::new();
        assert_eq!(session.tick(Duration::from_secs(1000)), None);
        assert!(!session.is_game_over());
    }

    #[test]
    fn test_review() {
        let mut session = GameSession::new();
        play(&mut session, &[(3, 3), (3, 4), (4, 4)]);

        assert_eq!(session.review(0).unwrap(), Snapshot::initial());
        let after_one = session.review(1).unwrap();
        assert_eq!(after_one.move_count, 1);
        assert_eq!(after_one.last_move, Some(Pos::new(3, 3)));
        assert_eq!(session.review(3).unwrap(), session.snapshot());
        assert_eq!(
            session.review(4),
            Err(SessionError::ReviewOutOfRange { index: 4, len: 3 })
        );
    }

    #[test]
    fn test_from_snapshot_round_trip() {
        let mut session = GameSession::new();
        play(&mut session, &[(1, 1), (2, 2)]);
        let resumed = GameSession::from_snapshot(session.snapshot()).unwrap();
        assert_eq!(resumed.snapshot(), session.snapshot());
        assert!(resumed.move_history().is_empty());
    }

    #[test]
    fn test_from_snapshot_keeps_open_game_open() {
        let mut session = GameSession::new();
        play(&mut session, &[(0, 0), (7, 7)]);
        let resumed = GameSession::from_snapshot(session.snapshot()).unwrap();
        assert!(!resumed.is_game_over());
        assert_eq!(resumed.outcome(), None);
    }

    #[test]
    fn test_from_snapshot_rejects_bad_scores() {
        let mut snapshot = Snapshot::initial();
        snapshot.white_score = 3;
        assert!(GameSession::from_snapshot(snapshot).is_err());
    }
}
