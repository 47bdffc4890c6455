//! Tactical move selection shared by the medium, hard and expert tiers
//!
//! The priority ladder, highest first:
//! 1. Form a vector (most lines wins)
//! 2. Block a cell where the opponent would form a vector
//! 3. Block an opponent triple
//! 4. Extend an own triple
//! 5. Block an opponent pair
//! 6. Extend an own pair
//!
//! Only cells legal for the side to move are ever considered.

use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::debug;

use crate::board::{Board, Color, Pos};
use crate::eval::find_connected_runs;
use crate::rules::{count_lines, has_nexus, is_legal_move, simulate_move};

/// Which ladder step produced a move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tactic {
    FormLine,
    BlockLine,
    BlockTriple,
    ExtendTriple,
    BlockPair,
    ExtendPair,
}

/// A move chosen by the ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TacticalMove {
    pub pos: Pos,
    pub tactic: Tactic,
}

/// The candidate among `moves` forming the most vectors for `color`.
///
/// Returns the move and its line count; ties go to the earliest move.
pub fn most_lines(board: &Board, moves: &[Pos], color: Color) -> Option<(Pos, u8)> {
    let mut best: Option<(Pos, u8)> = None;
    for &pos in moves {
        let lines = count_lines(board, pos, color);
        if lines > 0 && best.map_or(true, |(_, b)| lines > b) {
            best = Some((pos, lines));
        }
    }
    best
}

/// Keep only cells present in `legal`, preserving order
fn legal_only(cells: Vec<Pos>, legal: &[Pos]) -> Vec<Pos> {
    cells.into_iter().filter(|p| legal.contains(p)).collect()
}

/// Legal cells extending one of the opponent's open triples
pub fn triple_blocks(board: &Board, color: Color, legal: &[Pos]) -> Vec<Pos> {
    let runs = find_connected_runs(board, color.opponent());
    legal_only(runs.triple_extensions(board), legal)
}

/// Uniform choice among equally ranked candidates
#[inline]
pub fn pick<R: Rng + ?Sized>(rng: &mut R, cells: &[Pos]) -> Option<Pos> {
    cells.choose(rng).copied()
}

/// Run the ladder. `None` means every step came up empty.
pub fn priority_ladder<R: Rng + ?Sized>(
    board: &Board,
    color: Color,
    legal: &[Pos],
    rng: &mut R,
) -> Option<TacticalMove> {
    let opponent = color.opponent();
    let found = |pos: Pos, tactic: Tactic| {
        debug!(%pos, ?tactic, "ladder step");
        Some(TacticalMove { pos, tactic })
    };

    if let Some((pos, _)) = most_lines(board, legal, color) {
        return found(pos, Tactic::FormLine);
    }
    if let Some((pos, _)) = most_lines(board, legal, opponent) {
        return found(pos, Tactic::BlockLine);
    }

    let theirs = find_connected_runs(board, opponent);
    let ours = find_connected_runs(board, color);

    let steps = [
        (legal_only(theirs.triple_extensions(board), legal), Tactic::BlockTriple),
        (legal_only(ours.triple_extensions(board), legal), Tactic::ExtendTriple),
        (legal_only(theirs.pair_extensions(board), legal), Tactic::BlockPair),
        (legal_only(ours.pair_extensions(board), legal), Tactic::ExtendPair),
    ];
    for (cells, tactic) in steps {
        if let Some(pos) = pick(rng, &cells) {
            return found(pos, tactic);
        }
    }

    None
}

/// A legal move that forms a vector and completes a Nexus for `color`
pub fn instant_win(board: &Board, color: Color, legal: &[Pos]) -> Option<Pos> {
    legal.iter().copied().find(|&pos| {
        count_lines(board, pos, color) > 0 && has_nexus(&simulate_move(board, pos, color), color)
    })
}

/// A legal cell where the opponent's next placement would complete a Nexus.
///
/// Cells the opponent could not legally play are not threats; cells the
/// defender cannot legally play are never returned.
pub fn prevent_nexus(board: &Board, color: Color, legal: &[Pos]) -> Option<Pos> {
    let opponent = color.opponent();
    legal.iter().copied().find(|&pos| {
        count_lines(board, pos, opponent) > 0
            && is_legal_move(board, pos, opponent)
            && has_nexus(&simulate_move(board, pos, opponent), opponent)
    })
}
