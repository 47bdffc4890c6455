//! Session snapshot: the wire and storage shape exchanged between the
//! authoritative session and its projections.
//!
//! ```json
//! {"board": [[null, {"color": "white", "protectionLevel": 1}, ...], ...],
//!  "currentPlayer": "black", "whiteScore": 1, "blackScore": 0,
//!  "moveCount": 7, "lastMove": {"row": 0, "col": 1}, "gameOver": false}
//! ```

use serde::{Deserialize, Serialize};

use crate::board::{Board, Color, Pos};
use crate::error::SnapshotError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub board: Board,
    pub current_player: Color,
    pub white_score: u32,
    pub black_score: u32,
    pub move_count: u32,
    pub last_move: Option<Pos>,
    pub game_over: bool,
}

impl Snapshot {
    /// Snapshot of a fresh game
    pub fn initial() -> Self {
        Self {
            board: Board::new(),
            current_player: Color::White,
            white_score: 0,
            black_score: 0,
            move_count: 0,
            last_move: None,
            game_over: false,
        }
    }

    #[inline]
    pub fn score(&self, color: Color) -> u32 {
        match color {
            Color::White => self.white_score,
            Color::Black => self.black_score,
        }
    }

    /// Scores must equal the on-board protection totals
    pub fn validate(&self) -> Result<(), SnapshotError> {
        for color in [Color::White, Color::Black] {
            let total = self.board.protection_total(color);
            let score = self.score(color);
            if score != total {
                return Err(SnapshotError::InconsistentScores { color, score, total });
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode and validate
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::initial()
    }
}
