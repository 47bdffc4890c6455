//! Flux command-line driver
//!
//! Self-play between two engines, or a terminal game against the AI.

mod cli;

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use flux::{AIEngine, Color, Difficulty, GameMode, GameSession, LocalGame, MoveOutcome, Pos};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Selfplay {
            white,
            black,
            seed,
            time_limit_ms,
            max_plies,
            json,
        } => run_selfplay(white, black, seed, time_limit_ms, max_plies, json),
        Command::Play {
            difficulty,
            color,
            seed,
            time_limit_ms,
        } => run_play(difficulty, color.into(), seed, time_limit_ms),
    }
}

fn engine(difficulty: Difficulty, time_limit_ms: u64, seed: Option<u64>) -> AIEngine {
    let engine = AIEngine::with_config(difficulty, time_limit_ms);
    match seed {
        Some(seed) => engine.with_seed(seed),
        None => engine,
    }
}

/// Two engines play until the game ends or `max_plies` is reached
fn run_selfplay(
    white: Difficulty,
    black: Difficulty,
    seed: Option<u64>,
    time_limit_ms: u64,
    max_plies: u32,
    as_json: bool,
) -> Result<()> {
    info!(%white, %black, ?seed, time_limit_ms, "starting self-play");

    let mut engines = [
        engine(white, time_limit_ms, seed),
        engine(black, time_limit_ms, seed.map(|s| s.wrapping_add(1))),
    ];
    let mut session = GameSession::new();
    let mut stats = Vec::new();

    while !session.is_game_over() && session.move_count() < max_plies {
        let color = session.current_player();
        let engine = match color {
            Color::White => &mut engines[0],
            Color::Black => &mut engines[1],
        };
        let result = engine.select_move_with_stats(session.board(), color);
        let Some(pos) = result.best_move else {
            bail!("{color} has no move but the game is not over");
        };
        let outcome = session
            .apply_move(pos.row as i32, pos.col as i32)
            .with_context(|| format!("engine move {pos} for {color} was rejected"))?;

        if !as_json {
            println!(
                "{:>3}. {:<5} {:<6} {:?} score={} depth={} {}ms",
                session.move_count(),
                color.to_string(),
                outcome.record.notation,
                result.search_type,
                result.score,
                result.depth,
                result.time_ms
            );
        }
        stats.push(result);
    }

    if as_json {
        let report = json!({
            "white": white,
            "black": black,
            "moves": session.move_log(),
            "stats": stats,
            "final": session.snapshot(),
            "outcome": session.outcome(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("\n{}", session.board());
        print_result(&session);
    }
    Ok(())
}

/// Interactive game on stdin/stdout
fn run_play(difficulty: Difficulty, human: Color, seed: Option<u64>, time_limit_ms: u64) -> Result<()> {
    let mode = GameMode::VersusAi { human, difficulty };
    let mut game = LocalGame::with_engine(mode, engine(difficulty, time_limit_ms, seed));

    println!("You play {human} against {difficulty} AI.");
    println!("Enter a cell (e.g. D5 or `3 4`), `hint`, `resign` or `quit`.\n");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while !game.session().is_game_over() {
        if game.is_ai_turn() {
            let outcome = game.play_ai_turn().context("AI move rejected")?;
            report_move("AI", &outcome);
            continue;
        }

        println!("{}", game.session().board());
        print!("{} to move> ", game.session().current_player());
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let input = line?;
        let input = input.trim();

        match input.to_ascii_lowercase().as_str() {
            "" => continue,
            "quit" | "exit" => {
                println!("Game abandoned.");
                return Ok(());
            }
            "resign" => {
                let outcome = game.resign()?;
                if let Some(winner) = outcome.winner {
                    println!("You resigned; {winner} wins.");
                }
                return Ok(());
            }
            "hint" => {
                match game.suggest() {
                    Some(pos) => println!("Hint: {pos}"),
                    None => println!("No move available."),
                }
                continue;
            }
            _ => {}
        }

        let Some(pos) = parse_cell(input) else {
            println!("Could not read `{input}` as a cell.");
            continue;
        };
        match game.human_move(pos.row as i32, pos.col as i32) {
            Ok(outcome) => report_move("You", &outcome),
            Err(err) => println!("Illegal move: {err}"),
        }
    }

    println!("\n{}", game.session().board());
    print_result(game.session());
    Ok(())
}

/// Accepts `D5` or `row col`
fn parse_cell(input: &str) -> Option<Pos> {
    if let Some(pos) = Pos::from_notation(input) {
        return Some(pos);
    }
    let mut parts = input.split(|c: char| c.is_whitespace() || c == ',').filter(|s| !s.is_empty());
    let row = parts.next()?.parse().ok()?;
    let col = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Pos::try_new(row, col)
}

fn report_move(who: &str, outcome: &MoveOutcome) {
    println!("{who} played {}", outcome.record.notation);
    if outcome.lines_formed() > 0 {
        let cleared: Vec<String> = outcome.removed.iter().map(|pos| pos.notation()).collect();
        println!(
            "  {} line(s) formed, node at {}, cleared [{}]",
            outcome.lines_formed(),
            outcome.record.pos,
            cleared.join(", ")
        );
    }
}

fn print_result(session: &GameSession) {
    println!(
        "Score: white {} / black {} after {} moves",
        session.score(Color::White),
        session.score(Color::Black),
        session.move_count()
    );
    match session.outcome() {
        Some(outcome) => match outcome.winner {
            Some(winner) => println!("{winner} wins ({:?})", outcome.reason),
            None => println!("No winner ({:?})", outcome.reason),
        },
        None => println!("Game not finished"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cell() {
        assert_eq!(parse_cell("A8"), Some(Pos::new(0, 0)));
        assert_eq!(parse_cell("d5"), Some(Pos::new(3, 3)));
        assert_eq!(parse_cell("3 4"), Some(Pos::new(3, 4)));
        assert_eq!(parse_cell("7,7"), Some(Pos::new(7, 7)));
        assert_eq!(parse_cell("8 0"), None);
        assert_eq!(parse_cell("1 2 3"), None);
        assert_eq!(parse_cell("zz"), None);
    }
}
