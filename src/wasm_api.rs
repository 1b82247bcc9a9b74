use crate::game::{Game, MoveOutcome, Phase};
use crate::moves::Move;
use crate::piece::{Piece, Player, Rank};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
struct SquarePiece {
    player: String,
    rank: String,
}

#[derive(Serialize)]
struct MoveJson {
    from: [i32; 2],
    to: [i32; 2],
}

#[derive(Serialize)]
struct BoardState {
    /// Indexed `[row][col]`.
    squares: Vec<Vec<Option<SquarePiece>>>,
    current_player: String,
    chain_in_progress: bool,
    forced_piece: Option<[usize; 2]>,
    winner: Option<String>,
    legal_moves: Vec<MoveJson>,
}

#[derive(Serialize)]
struct MoveResult {
    #[serde(flatten)]
    board_state: Option<BoardState>,
    applied: bool,
    turn_ended: bool,
    captured: Option<[usize; 2]>,
    error: Option<String>,
}

#[derive(Serialize)]
struct TargetJson {
    to: [usize; 2],
    capture: bool,
}

fn player_to_string(p: Player) -> String {
    match p {
        Player::Player1 => "Player1".to_string(),
        Player::Player2 => "Player2".to_string(),
    }
}

fn rank_to_string(r: Rank) -> String {
    match r {
        Rank::Regular => "Regular".to_string(),
        Rank::King => "King".to_string(),
    }
}

fn square_of(p: Piece) -> [usize; 2] {
    [p.col, p.row]
}

fn build_board_state(game: &Game) -> BoardState {
    let squares: Vec<Vec<Option<SquarePiece>>> = (0..8)
        .map(|r| {
            (0..8)
                .map(|c| {
                    game.piece_at(c, r).map(|p| SquarePiece {
                        player: player_to_string(p.player),
                        rank: rank_to_string(p.rank),
                    })
                })
                .collect()
        })
        .collect();

    let legal_moves: Vec<MoveJson> = game
        .legal_moves()
        .iter()
        .map(|m| MoveJson {
            from: [m.from.0, m.from.1],
            to: [m.to.0, m.to.1],
        })
        .collect();

    BoardState {
        squares,
        current_player: player_to_string(game.current_player()),
        chain_in_progress: game.phase() == Phase::ChainInProgress,
        forced_piece: game.chain().forced.map(square_of),
        winner: game.is_game_over().map(player_to_string),
        legal_moves,
    }
}

/// `was_over` is whether the game had already ended before the request, so a
/// winning move can be told apart from a request made after the end.
fn build_move_result(game: &Game, outcome: MoveOutcome, was_over: bool) -> MoveResult {
    let state = Some(build_board_state(game));
    match outcome {
        MoveOutcome::Rejected(reason) => MoveResult {
            board_state: state,
            applied: false,
            turn_ended: false,
            captured: None,
            error: Some(reason.to_string()),
        },
        MoveOutcome::Applied { turn_ended, captured } => MoveResult {
            board_state: state,
            applied: true,
            turn_ended,
            captured: captured.map(square_of),
            error: None,
        },
        MoveOutcome::GameOver(_) => {
            let captured = if was_over {
                None
            } else {
                game.last_move().and_then(|l| l.captured).map(square_of)
            };
            MoveResult {
                board_state: state,
                applied: !was_over,
                turn_ended: true,
                captured,
                error: None,
            }
        }
    }
}

fn to_js<T: Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

/// Browser-facing handle to one game session.
#[wasm_bindgen(js_name = Game)]
pub struct GameHandle {
    game: Game,
}

#[wasm_bindgen(js_class = Game)]
impl GameHandle {
    #[wasm_bindgen(constructor)]
    pub fn new() -> GameHandle {
        GameHandle { game: Game::new() }
    }

    pub fn reset(&mut self) {
        self.game.initialize();
    }

    pub fn get_board_state(&self) -> JsValue {
        to_js(&build_board_state(&self.game))
    }

    pub fn make_move(&mut self, from_col: i32, from_row: i32, to_col: i32, to_row: i32) -> JsValue {
        let was_over = self.game.is_game_over().is_some();
        let outcome = self.game.perform_move(from_col, from_row, to_col, to_row);
        to_js(&build_move_result(&self.game, outcome, was_over))
    }

    /// Apply a move received from the remote peer in `fromCol:fromRow:toCol:toRow` form.
    pub fn apply_wire_move(&mut self, wire: &str) -> JsValue {
        match wire.parse::<Move>() {
            Ok(m) => {
                let was_over = self.game.is_game_over().is_some();
                let outcome = self.game.apply(&m);
                to_js(&build_move_result(&self.game, outcome, was_over))
            }
            Err(e) => to_js(&MoveResult {
                board_state: None,
                applied: false,
                turn_ended: false,
                captured: None,
                error: Some(e.to_string()),
            }),
        }
    }

    pub fn get_legal_moves_for_square(&self, col: i32, row: i32) -> JsValue {
        let targets: Vec<TargetJson> = self
            .game
            .legal_targets(col, row)
            .iter()
            .map(|m| TargetJson {
                to: [m.to.0, m.to.1],
                capture: m.captured().is_some(),
            })
            .collect();
        to_js(&targets)
    }

    pub fn get_snapshot_json(&self) -> String {
        serde_json::to_string(&self.game).unwrap_or_default()
    }
}

impl Default for GameHandle {
    fn default() -> Self {
        Self::new()
    }
}
