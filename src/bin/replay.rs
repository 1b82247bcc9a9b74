use std::io::{BufRead, BufReader};

use checkers::game::{Game, MoveOutcome};
use checkers::moves::Move;

/// Reads one `fromCol:fromRow:toCol:toRow` move per line from stdin, as a
/// remote peer would send them, and applies each to a fresh game. Blank lines
/// and lines starting with '#' are skipped.
fn main() {
    let mut game = Game::new();
    let stdin = BufReader::new(std::io::stdin());

    for (idx, line) in stdin.lines().enumerate() {
        let line_no = idx + 1;
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("read error on line {line_no}: {e}");
                std::process::exit(1);
            }
        };
        let text = line.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        let m: Move = match text.parse() {
            Ok(m) => m,
            Err(e) => {
                eprintln!("line {line_no}: {e}");
                continue;
            }
        };

        let mover = game.current_player();
        match game.apply(&m) {
            MoveOutcome::Rejected(reason) => {
                println!("{line_no}: {mover:?} {m} rejected ({reason})")
            }
            MoveOutcome::Applied { turn_ended, captured } => {
                let capture = captured
                    .map(|p| format!(", captured ({}, {})", p.col, p.row))
                    .unwrap_or_default();
                let next = if turn_ended { "turn passes" } else { "must continue jumping" };
                println!("{line_no}: {mover:?} {m}{capture}, {next}");
            }
            MoveOutcome::GameOver(winner) => {
                println!("{line_no}: {mover:?} {m}, game over: {winner:?} wins");
            }
        }
    }

    println!("\n{}", game.board());
    match game.is_game_over() {
        Some(winner) => println!("{winner:?} won"),
        None => println!("{:?} to move", game.current_player()),
    }
}
