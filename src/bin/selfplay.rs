use std::io::Write;

use checkers::game::{Game, MoveOutcome};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

const MAX_MOVES: u32 = 500;
const GAMES: usize = 20;

/// Plays random legal games and prints a tally. An optional first argument
/// seeds the generator so a run can be repeated.
fn main() {
    let seed = match std::env::args().nth(1) {
        Some(arg) => match arg.parse::<u64>() {
            Ok(seed) => seed,
            Err(_) => {
                eprintln!("usage: selfplay [seed]");
                std::process::exit(2);
            }
        },
        None => rand::random(),
    };
    let mut rng = StdRng::seed_from_u64(seed);

    println!("=== Random self-play: {GAMES} games, seed {seed} ===");

    let (mut p1_wins, mut p2_wins, mut unfinished) = (0, 0, 0);
    for game_no in 1..=GAMES {
        let mut game = Game::new();
        let mut requests = 0;
        let mut jumps = 0;

        while requests < MAX_MOVES && game.is_game_over().is_none() {
            let legal = game.legal_moves();
            let Some(m) = legal.choose(&mut rng) else {
                // Stalemates are not scored by the rules; stop the game here.
                break;
            };
            match game.apply(m) {
                MoveOutcome::Applied { captured: Some(_), .. } | MoveOutcome::GameOver(_) => {
                    jumps += 1
                }
                MoveOutcome::Applied { .. } => {}
                MoveOutcome::Rejected(reason) => {
                    eprintln!("game {game_no}: enumerated move {m} was rejected: {reason}");
                    eprintln!("{}", game.board());
                    std::process::exit(1);
                }
            }
            requests += 1;
        }

        let result = match game.is_game_over() {
            Some(winner) => {
                if winner == checkers::piece::Player::Player1 {
                    p1_wins += 1;
                } else {
                    p2_wins += 1;
                }
                format!("{winner:?} wins")
            }
            None => {
                unfinished += 1;
                "unfinished".to_string()
            }
        };
        println!("  game {game_no:>2}: {result} after {requests} moves, {jumps} captures");
        std::io::stdout().flush().ok();

        if game_no == GAMES {
            println!("\nFinal position:\n{}", game.board());
            match serde_json::to_string(&game) {
                Ok(json) => println!("{json}"),
                Err(e) => eprintln!("could not serialize final position: {e}"),
            }
        }
    }

    println!("\nPlayer1 {p1_wins}, Player2 {p2_wins}, unfinished {unfinished}");
}
