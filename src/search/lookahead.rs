//! Positional scoring for the medium tier and one-ply lookahead for the hard tier

use crate::board::{Board, Color, Pos};
use crate::eval::{distance_from_center, find_connected_runs, is_adjacent_to, EvalWeight};
use crate::rules::{count_lines, legal_moves, simulate_move};

/// Medium-tier score: central, next to own pieces, away from the opponent.
pub fn positional_score(board: &Board, pos: Pos, color: Color) -> i32 {
    let mut score = -distance_from_center(pos) * EvalWeight::DISTANCE;
    if is_adjacent_to(board, pos, color) {
        score += EvalWeight::ADJACENT_OWN;
    }
    if is_adjacent_to(board, pos, color.opponent()) {
        score -= EvalWeight::ADJACENT_OPPONENT;
    }
    score
}

/// Highest-scoring move; ties go to the earliest in `moves`
fn best_by<F>(moves: &[Pos], mut score: F) -> Option<(Pos, i32)>
where
    F: FnMut(Pos) -> i32,
{
    let mut best: Option<(Pos, i32)> = None;
    for &pos in moves {
        let s = score(pos);
        if best.map_or(true, |(_, b)| s > b) {
            best = Some((pos, s));
        }
    }
    best
}

/// Best move by [`positional_score`]
pub fn best_positional(board: &Board, color: Color, legal: &[Pos]) -> Option<(Pos, i32)> {
    best_by(legal, |pos| positional_score(board, pos, color))
}

/// Largest threat among `opponent`'s replies on `board`: 25 per vector a
/// reply would form, or 20 for a reply extending one of their triples.
pub fn opponent_threat(board: &Board, opponent: Color) -> i32 {
    let triple_cells = find_connected_runs(board, opponent).triple_extensions(board);

    legal_moves(board, opponent)
        .into_iter()
        .map(|reply| {
            let lines = i32::from(count_lines(board, reply, opponent));
            let mut threat = lines * EvalWeight::THREAT_PER_LINE;
            if triple_cells.contains(&reply) {
                threat = threat.max(EvalWeight::THREAT_TRIPLE);
            }
            threat
        })
        .max()
        .unwrap_or(0)
}

/// Hard-tier choice: positional value minus the worst reply it allows.
pub fn best_lookahead(board: &Board, color: Color, legal: &[Pos]) -> Option<(Pos, i32)> {
    let opponent = color.opponent();
    let their_pairs = find_connected_runs(board, opponent).pair_extensions(board);
    let our_pairs = find_connected_runs(board, color).pair_extensions(board);

    best_by(legal, |pos| {
        let mut score = -distance_from_center(pos) * EvalWeight::DISTANCE;
        if is_adjacent_to(board, pos, color) {
            score += EvalWeight::ADJACENT_OWN;
        }
        if their_pairs.contains(&pos) {
            score += EvalWeight::PAIR_BLOCK;
        }
        if our_pairs.contains(&pos) {
            score += EvalWeight::PAIR_EXTEND;
        }
        let next = simulate_move(board, pos, color);
        score - opponent_threat(&next, opponent)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_prefers_center() {
        let board = Board::new();
        let legal = legal_moves(&board, Color::White);
        let (pos, score) = best_positional(&board, Color::White, &legal).unwrap();
        // First of the four central cells in scan order
        assert_eq!(pos, Pos::new(3, 3));
        assert_eq!(score, -5);
    }

    #[test]
    fn test_positional_adjacency() {
        let mut board = Board::new();
        board.place_stone(Pos::new(0, 0), Color::White);
        board.place_stone(Pos::new(7, 7), Color::Black);
        // (1,1): distance 5, next to own
        assert_eq!(positional_score(&board, Pos::new(1, 1), Color::White), -25 + 20);
        // (6,6): distance 5, next to opponent
        assert_eq!(positional_score(&board, Pos::new(6, 6), Color::White), -25 - 10);
    }

    #[test]
    fn test_opponent_threat() {
        let board = Board::from_diagram(&[
            ". . . . . . . .",
            ". . . . . . . .",
            ". . . . . . . .",
            ". . b b b . . .",
            ". . . . . . . .",
            ". . . . . . . .",
            ". . . . . . . .",
            ". . . . . . . .",
        ])
        .unwrap();
        assert_eq!(opponent_threat(&board, Color::Black), 25);
        assert_eq!(opponent_threat(&Board::new(), Color::Black), 0);
    }

    #[test]
    fn test_lookahead_avoids_giving_a_vector() {
        // Black pair on row 7 with white far away: any white move leaves
        // black unable to form a vector, so the choice stays central.
        let board = Board::from_diagram(&[
            ". . . . . . . .",
            ". . . . . . . .",
            ". . . . . . . .",
            ". . . . . . . .",
            ". . . . . . . .",
            ". . . . . . . .",
            ". . . . . . . .",
            "b b . . . . . .",
        ])
        .unwrap();
        let legal = legal_moves(&board, Color::White);
        let (pos, _) = best_lookahead(&board, Color::White, &legal).unwrap();
        assert!(legal.contains(&pos));
        assert!(distance_from_center(pos) <= 2);
    }
}
