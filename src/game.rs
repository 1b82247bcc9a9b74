use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::moves::Move;
use crate::piece::{Piece, Player};
use crate::rules::{self, CaptureChain, IllegalMove, LegalMove};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Phase {
    AwaitingMove,
    /// The current player must continue jumping with the forced piece, or decline.
    ChainInProgress,
    GameOver(Player),
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Nothing changed; the same player may try again.
    Rejected(IllegalMove),
    Applied {
        /// False when the same player must keep jumping.
        turn_ended: bool,
        captured: Option<Piece>,
    },
    GameOver(Player),
}

/// The most recently committed move and the piece it removed, if any.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct LastMove {
    pub mv: Move,
    pub captured: Option<Piece>,
}

impl MoveOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, MoveOutcome::Rejected(_))
    }
}

/// One game of checkers. Owns the board, whose turn it is and any capture
/// chain in progress; every change goes through [`Game::perform_move`].
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Game {
    board: Board,
    current_turn: Player,
    chain: CaptureChain,
    phase: Phase,
    last_move: Option<LastMove>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// A fresh game in the starting position, Player1 to move.
    pub fn new() -> Self {
        Game::from_position(Board::new(), Player::Player1)
    }

    /// A game continuing from an arbitrary position.
    pub fn from_position(board: Board, to_move: Player) -> Self {
        let mut game = Game {
            board,
            current_turn: to_move,
            chain: CaptureChain::default(),
            phase: Phase::AwaitingMove,
            last_move: None,
        };
        game.check_game_over();
        game
    }

    /// Reset to the starting position.
    pub fn initialize(&mut self) {
        *self = Game::new();
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn chain(&self) -> &CaptureChain {
        &self.chain
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The last move that changed the board. Declining a chain is not recorded.
    pub fn last_move(&self) -> Option<LastMove> {
        self.last_move
    }

    pub fn current_player(&self) -> Player {
        self.current_turn
    }

    pub fn piece_at(&self, col: i32, row: i32) -> Option<Piece> {
        self.board.piece_at(col, row)
    }

    pub fn all_pieces(&self) -> impl Iterator<Item = Piece> + '_ {
        self.board.pieces()
    }

    /// The winner, once one side has no pieces left.
    pub fn is_game_over(&self) -> Option<Player> {
        match self.phase {
            Phase::GameOver(winner) => Some(winner),
            _ => None,
        }
    }

    /// Legal destinations for the piece on `(col, row)` in the current state.
    pub fn legal_targets(&self, col: i32, row: i32) -> Vec<LegalMove> {
        if self.is_game_over().is_some() {
            return Vec::new();
        }
        rules::legal_targets(&self.board, self.current_turn, &self.chain, col, row)
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        if self.is_game_over().is_some() {
            return Vec::new();
        }
        rules::legal_moves(&self.board, self.current_turn, &self.chain)
    }

    pub fn apply(&mut self, m: &Move) -> MoveOutcome {
        self.perform_move(m.from.0, m.from.1, m.to.0, m.to.1)
    }

    /// Validate and play a move for the player whose turn it is.
    ///
    /// During a capture chain only the forced piece may move, and naming its
    /// own square as both ends declines the rest of the chain. A rejected
    /// move leaves the game untouched.
    pub fn perform_move(
        &mut self,
        from_col: i32,
        from_row: i32,
        to_col: i32,
        to_row: i32,
    ) -> MoveOutcome {
        if let Phase::GameOver(winner) = self.phase {
            return MoveOutcome::GameOver(winner);
        }
        let from = (from_col, from_row);
        let to = (to_col, to_row);

        if let Some(forced) = self.chain.forced {
            if (forced.col as i32, forced.row as i32) != from {
                return MoveOutcome::Rejected(IllegalMove::WrongPieceInChain);
            }
            if from == to {
                self.end_turn();
                self.chain.declined = true;
                return MoveOutcome::Applied { turn_ended: true, captured: None };
            }
        }

        let legal = match rules::check_move(&self.board, self.current_turn, &self.chain, from, to) {
            Ok(m) => m,
            Err(reason) => return MoveOutcome::Rejected(reason),
        };

        let landed = legal.landed();
        let captured = legal.captured();
        self.board.remove(legal.piece);
        if let Some(c) = captured {
            self.board.remove(c);
        }
        self.board.insert(landed);
        self.chain.last_capture = captured;
        self.chain.declined = false;
        self.last_move = Some(LastMove {
            mv: Move::new(from_col, from_row, to_col, to_row),
            captured,
        });

        let continues =
            captured.is_some() && self.chain.has_forced_continuation(&self.board, landed);
        let turn_ended = if continues {
            self.phase = Phase::ChainInProgress;
            false
        } else {
            self.end_turn();
            true
        };

        match self.check_game_over() {
            Some(winner) => MoveOutcome::GameOver(winner),
            None => MoveOutcome::Applied { turn_ended, captured },
        }
    }

    fn end_turn(&mut self) {
        self.chain.reset();
        self.current_turn = self.current_turn.opposite();
        self.phase = Phase::AwaitingMove;
    }

    /// Enter the terminal phase if a side has run out of pieces. The winner is
    /// whoever still has pieces; stalemated positions play on.
    fn check_game_over(&mut self) -> Option<Player> {
        let winner = match (
            self.board.has_pieces(Player::Player1),
            self.board.has_pieces(Player::Player2),
        ) {
            (true, false) => Player::Player1,
            (false, true) => Player::Player2,
            _ => return None,
        };
        self.chain.reset();
        self.phase = Phase::GameOver(winner);
        Some(winner)
    }
}
