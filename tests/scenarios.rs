//! End-to-end game scenarios through the public session API

use flux::rules::{check_nexus, detect_lines, is_legal_move};
use flux::{
    Board, Color, Direction, EndReason, GameSession, IllegalMove, Piece, Pos, Snapshot,
    SnapshotError,
};

fn session_from(rows: &[&str], to_move: Color, white_score: u32, black_score: u32) -> GameSession {
    let board = Board::from_diagram(rows).expect("valid diagram");
    let piece_count = board.piece_count();
    GameSession::from_snapshot(Snapshot {
        board,
        current_player: to_move,
        white_score,
        black_score,
        move_count: piece_count,
        last_move: None,
        game_over: false,
    })
    .expect("consistent snapshot")
}

#[test]
fn test_scenario_a_quiet_opening() {
    let mut session = GameSession::new();

    let first = session.apply_move(3, 3).unwrap();
    let second = session.apply_move(3, 4).unwrap();

    assert_eq!(first.lines_formed(), 0);
    assert_eq!(second.lines_formed(), 0);
    assert_eq!(session.current_player(), Color::White);
    assert_eq!(session.score(Color::White), 0);
    assert_eq!(session.score(Color::Black), 0);
    assert_eq!(session.move_count(), 2);
    assert_eq!(session.board().color_at(Pos::new(3, 3)), Some(Color::White));
    assert_eq!(session.board().color_at(Pos::new(3, 4)), Some(Color::Black));
}

#[test]
fn test_scenario_b_line_clears_ions() {
    let mut session = session_from(
        &[
            "w w w . . . . .",
            ". . . . . . . .",
            ". . . . . . . .",
            ". . . . . . . .",
            ". . . . . . . .",
            ". . . . . . . .",
            "b . b . b . . .",
            ". . . . . . . .",
        ],
        Color::White,
        0,
        0,
    );

    let outcome = session.apply_move(0, 3).unwrap();

    assert_eq!(outcome.lines_formed(), 1);
    let vector = &outcome.vectors()[0];
    assert_eq!(vector.direction, Direction::Horizontal);
    assert_eq!(
        vector.positions,
        [Pos::new(0, 0), Pos::new(0, 1), Pos::new(0, 2), Pos::new(0, 3)]
    );
    assert_eq!(session.board().get(Pos::new(0, 3)), Some(Piece::node(Color::White, 1)));
    for col in 0..3 {
        assert!(session.board().is_empty(Pos::new(0, col)));
    }
    assert_eq!(session.score(Color::White), 1);
    assert!(!session.is_game_over());
}

#[test]
fn test_scenario_c_nexus_ends_game() {
    let mut session = session_from(
        &[
            ". . . . . . . .",
            ". W W W . . . .",
            ". . . . . . . .",
            ". . . . . . . .",
            ". . . . . . . .",
            ". . b . b . . .",
            ". . . . . . . .",
            "b . . . . . . .",
        ],
        Color::White,
        3,
        0,
    );

    let outcome = session.apply_move(1, 4).unwrap();

    assert_eq!(outcome.lines_formed(), 1);
    assert!(outcome.removed.is_empty());
    let nexus = check_nexus(session.board()).unwrap();
    assert_eq!(nexus.winner, Color::White);
    assert_eq!(
        nexus.positions,
        [Pos::new(1, 1), Pos::new(1, 2), Pos::new(1, 3), Pos::new(1, 4)]
    );
    assert!(session.is_game_over());
    assert_eq!(session.winner(), Some(Color::White));
    assert_eq!(
        outcome.outcome.map(|o| o.reason),
        Some(EndReason::Nexus {
            positions: nexus.positions
        })
    );
    assert_eq!(session.apply_move(7, 7), Err(IllegalMove::GameOver));
}

#[test]
fn test_scenario_d_overlong_line_rejected() {
    let mut session = session_from(
        &[
            ". . . . . . . .",
            ". . . . . . . .",
            "w w w w . . . .",
            ". . . . . . . .",
            ". . . . . . . .",
            "b . b . b . b .",
            ". . . . . . . .",
            ". . . . . . . .",
        ],
        Color::White,
        0,
        0,
    );
    let before = session.snapshot();

    assert!(!is_legal_move(session.board(), Pos::new(2, 4), Color::White));
    assert!(is_legal_move(session.board(), Pos::new(2, 4), Color::Black));
    assert_eq!(
        session.apply_move(2, 4),
        Err(IllegalMove::LineTooLong(Pos::new(2, 4)))
    );
    assert_eq!(session.snapshot(), before);
    assert!(session.move_history().is_empty());
}

#[test]
fn test_scenario_e_node_count_tiebreak() {
    // Two-by-one stripes keep every run at three or less; the gap at A8
    // would give black five in a row.
    let mut session = session_from(
        &[
            "b b . b b w b w",
            "w b w b w b w b",
            "B w b w b w b w",
            "b w b w b w b w",
            "W b w b w b w b",
            "w b w b w b w b",
            "b W b w b w b w",
            "b w b w b w b .",
        ],
        Color::White,
        2,
        1,
    );
    assert!(!is_legal_move(session.board(), Pos::new(0, 2), Color::Black));

    let outcome = session.apply_move(7, 7).unwrap();

    assert_eq!(outcome.lines_formed(), 0);
    assert!(session.is_game_over());
    assert!(session.legal_moves().is_empty());
    let result = outcome.outcome.unwrap();
    assert_eq!(result.winner, Some(Color::White));
    assert_eq!(result.reason, EndReason::NodeCount { white: 2, black: 1 });
}

#[test]
fn test_detect_lines_is_pure() {
    let board = Board::from_diagram(&[
        ". . . . . . . .",
        ". . . . . . . .",
        ". . . b . . . .",
        ". . . b . . . .",
        ". . . b . . . .",
        ". . . b . . . .",
        ". . . . . . . .",
        ". . . . . . . .",
    ])
    .unwrap();
    let copy = board.clone();
    let first = detect_lines(&board, Pos::new(5, 3), Color::Black);
    let second = detect_lines(&board, Pos::new(5, 3), Color::Black);
    assert_eq!(first, second);
    assert_eq!(first.lines_formed, 1);
    assert_eq!(board, copy);
}

#[test]
fn test_snapshot_json_round_trip() {
    let mut session = GameSession::new();
    for (r, c) in [(0, 0), (7, 0), (0, 1), (7, 2), (0, 2), (7, 4), (0, 3)] {
        session.apply_move(r, c).unwrap();
    }
    let json = session.snapshot().to_json().unwrap();

    let decoded = Snapshot::from_json(&json).unwrap();
    assert_eq!(decoded, session.snapshot());
    assert_eq!(decoded.white_score, 1);
    assert_eq!(decoded.last_move, Some(Pos::new(0, 3)));

    let resumed = GameSession::from_snapshot(decoded).unwrap();
    assert_eq!(resumed.current_player(), Color::Black);
    assert_eq!(resumed.board(), session.board());
}

#[test]
fn test_snapshot_rejects_bad_protection_level() {
    let mut value = serde_json::to_value(Snapshot::initial()).unwrap();
    value["board"][0][0] = serde_json::json!({"color": "white", "protectionLevel": 5});
    value["whiteScore"] = serde_json::json!(5);
    let err = Snapshot::from_json(&value.to_string()).unwrap_err();
    assert!(matches!(err, SnapshotError::Json(_)));
    assert!(err.to_string().contains("protection level"));
}

#[test]
fn test_resumed_position_without_moves_is_finished() {
    // Scenario E after white fills H1, saved as if still open
    let mut session = session_from(
        &[
            "b b . b b w b w",
            "w b w b w b w b",
            "B w b w b w b w",
            "b w b w b w b w",
            "W b w b w b w b",
            "w b w b w b w b",
            "b W b w b w b w",
            "b w b w b w b w",
        ],
        Color::Black,
        2,
        1,
    );

    assert!(session.is_game_over());
    assert!(session.snapshot().game_over);
    assert!(session.legal_moves().is_empty());
    let outcome = session.outcome().copied().unwrap();
    assert_eq!(outcome.winner, Some(Color::White));
    assert_eq!(outcome.reason, EndReason::NodeCount { white: 2, black: 1 });
    assert_eq!(session.apply_move(0, 2), Err(IllegalMove::GameOver));
}
