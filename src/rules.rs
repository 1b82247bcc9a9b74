// =============================================================================
// Checkers rules
//
// Move legality, promotion and the multi-jump ("capture chain") bookkeeping.
// Validation is side-effect free: it classifies a move and names the piece a
// jump would capture, and the game session commits the result.
//
// Coordinate system: (col, row), row 0 at the top. Player1 regular pieces move
// toward row 0, Player2 regular pieces toward row 7.
// =============================================================================

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::Board;
use crate::moves::Move;
use crate::piece::{Piece, Player};

const ALL_DIAGONALS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Why a move request was refused. Variants follow the order in which the
/// checks are made.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, Error, PartialEq, Eq)]
pub enum IllegalMove {
    #[error("a different piece must continue the capture chain")]
    WrongPieceInChain,
    #[error("no piece on the starting square")]
    NoPiece,
    #[error("that piece belongs to the other player")]
    NotYourPiece,
    #[error("destination is off the board")]
    OutOfBounds,
    #[error("destination equals the starting square")]
    NoMovement,
    #[error("destination is occupied")]
    Occupied,
    #[error("moves must be diagonal")]
    NotDiagonal,
    #[error("regular pieces cannot move backwards")]
    WrongDirection,
    #[error("pieces move one square, or two when jumping")]
    TooFar,
    #[error("a two-square move must jump an opponent piece")]
    NothingToJump,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum LegalMoveKind {
    Simple,
    /// A jump; carries the opponent piece it removes.
    Capture(Piece),
}

/// A validated move, ready to be committed.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct LegalMove {
    pub piece: Piece,
    pub to: (usize, usize),
    pub kind: LegalMoveKind,
}

impl LegalMove {
    pub fn captured(&self) -> Option<Piece> {
        match self.kind {
            LegalMoveKind::Simple => None,
            LegalMoveKind::Capture(p) => Some(p),
        }
    }

    /// The piece as it stands after the move, promotion applied.
    pub fn landed(&self) -> Piece {
        self.piece.moved_to(self.to.0, self.to.1)
    }
}

/// Transient state of a multi-jump. Empty between turns.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub struct CaptureChain {
    /// Only this piece may move while a chain is in progress.
    pub forced: Option<Piece>,
    /// The piece removed by the most recent jump.
    pub last_capture: Option<Piece>,
    /// Set when the player ended the chain early; cleared by the next move
    /// that changes the board.
    pub declined: bool,
}

impl CaptureChain {
    pub fn reset(&mut self) {
        *self = CaptureChain::default();
    }

    pub fn in_progress(&self) -> bool {
        self.forced.is_some()
    }

    /// After a jump by `moved`, decide whether it must keep jumping. Records
    /// the piece as forced when it must, clears the forced piece otherwise.
    pub fn has_forced_continuation(&mut self, board: &Board, moved: Piece) -> bool {
        let jumped_adjacent = self.last_capture.is_some_and(|c| {
            c.player != moved.player
                && c.col.abs_diff(moved.col) == 1
                && c.row.abs_diff(moved.row) == 1
        });
        if jumped_adjacent && can_jump(board, moved) {
            self.forced = Some(moved);
            true
        } else {
            self.forced = None;
            false
        }
    }
}

/// Diagonal directions a piece may travel: all four for kings, the two
/// forward ones for regular pieces.
pub fn directions(piece: &Piece) -> Vec<(i32, i32)> {
    if piece.is_king() {
        ALL_DIAGONALS.to_vec()
    } else {
        let dr = piece.player.forward();
        vec![(-1, dr), (1, dr)]
    }
}

/// Whether `piece` has a jump available from where it stands.
pub fn can_jump(board: &Board, piece: Piece) -> bool {
    let (col, row) = (piece.col as i32, piece.row as i32);
    directions(&piece).into_iter().any(|(dc, dr)| {
        let over = board.piece_at(col + dc, row + dr);
        let (lc, lr) = (col + 2 * dc, row + 2 * dr);
        over.is_some_and(|o| o.player != piece.player)
            && Board::in_bounds(lc, lr)
            && board.is_empty_at(lc, lr)
    })
}

/// Validate a move of the piece on `from` to `to` for the player to move.
pub fn check_move(
    board: &Board,
    turn: Player,
    chain: &CaptureChain,
    from: (i32, i32),
    to: (i32, i32),
) -> Result<LegalMove, IllegalMove> {
    let (fc, fr) = from;
    let (tc, tr) = to;

    if let Some(forced) = chain.forced {
        if (forced.col as i32, forced.row as i32) != from {
            return Err(IllegalMove::WrongPieceInChain);
        }
    }

    let piece = board.piece_at(fc, fr).ok_or(IllegalMove::NoPiece)?;
    if piece.player != turn {
        return Err(IllegalMove::NotYourPiece);
    }
    if !Board::in_bounds(tc, tr) {
        return Err(IllegalMove::OutOfBounds);
    }
    if from == to {
        return Err(IllegalMove::NoMovement);
    }
    if !board.is_empty_at(tc, tr) {
        return Err(IllegalMove::Occupied);
    }

    let (dc, dr) = (tc - fc, tr - fr);
    if dc.abs() != dr.abs() {
        return Err(IllegalMove::NotDiagonal);
    }
    if !piece.is_king() && dr.signum() != piece.player.forward() {
        return Err(IllegalMove::WrongDirection);
    }

    let kind = match dc.abs() {
        1 => LegalMoveKind::Simple,
        2 => {
            let over = board
                .piece_at((fc + tc) / 2, (fr + tr) / 2)
                .filter(|o| o.player != piece.player)
                .ok_or(IllegalMove::NothingToJump)?;
            LegalMoveKind::Capture(over)
        }
        _ => return Err(IllegalMove::TooFar),
    };

    Ok(LegalMove {
        piece,
        to: (tc as usize, tr as usize),
        kind,
    })
}

/// Every square the piece on `(col, row)` may legally move to.
pub fn legal_targets(
    board: &Board,
    turn: Player,
    chain: &CaptureChain,
    col: i32,
    row: i32,
) -> Vec<LegalMove> {
    let mut targets = Vec::new();
    for (dc, dr) in ALL_DIAGONALS {
        for step in 1..=2 {
            let to = (col + dc * step, row + dr * step);
            if let Ok(m) = check_move(board, turn, chain, (col, row), to) {
                targets.push(m);
            }
        }
    }
    targets
}

/// Every legal move for `turn`. Declining a chain is not listed.
pub fn legal_moves(board: &Board, turn: Player, chain: &CaptureChain) -> Vec<Move> {
    board
        .pieces_of(turn)
        .flat_map(|p| legal_targets(board, turn, chain, p.col as i32, p.row as i32))
        .map(|m| Move::from_legal(&m))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::Rank;

    fn check(
        board: &Board,
        turn: Player,
        from: (i32, i32),
        to: (i32, i32),
    ) -> Result<LegalMove, IllegalMove> {
        check_move(board, turn, &CaptureChain::default(), from, to)
    }

    #[test]
    fn opening_moves_for_player1() {
        let board = Board::new();
        let moves = legal_moves(&board, Player::Player1, &CaptureChain::default());
        // Four front-row pieces; the edge piece at (0,5) has one target, the others two.
        assert_eq!(moves.len(), 7);
        assert!(moves.iter().all(|m| m.from.1 == 5 && m.to.1 == 4));
    }

    #[test]
    fn rejects_in_rule_order() {
        let board = Board::new();
        let p1 = Player::Player1;
        assert_eq!(check(&board, p1, (3, 3), (4, 4)), Err(IllegalMove::NoPiece));
        assert_eq!(check(&board, p1, (1, 2), (2, 3)), Err(IllegalMove::NotYourPiece));
        assert_eq!(check(&board, p1, (0, 7), (-1, 8)), Err(IllegalMove::OutOfBounds));
        assert_eq!(check(&board, p1, (0, 5), (0, 5)), Err(IllegalMove::NoMovement));
        assert_eq!(check(&board, p1, (0, 7), (1, 6)), Err(IllegalMove::Occupied));
        assert_eq!(check(&board, p1, (2, 5), (2, 4)), Err(IllegalMove::NotDiagonal));
        assert_eq!(check(&board, p1, (2, 5), (5, 2)), Err(IllegalMove::Occupied));
        assert_eq!(check(&board, p1, (2, 5), (4, 3)), Err(IllegalMove::NothingToJump));
        assert_eq!(check(&board, p1, (-4, 2), (0, 0)), Err(IllegalMove::NoPiece));
    }

    #[test]
    fn regular_pieces_only_move_forward() {
        let mut board = Board::empty();
        board.insert(Piece::regular(3, 4, Player::Player1));
        board.insert(Piece::regular(3, 2, Player::Player2));

        assert!(check(&board, Player::Player1, (3, 4), (2, 3)).is_ok());
        assert_eq!(
            check(&board, Player::Player1, (3, 4), (2, 5)),
            Err(IllegalMove::WrongDirection)
        );
        assert!(check(&board, Player::Player2, (3, 2), (4, 3)).is_ok());
        assert_eq!(
            check(&board, Player::Player2, (3, 2), (4, 1)),
            Err(IllegalMove::WrongDirection)
        );
    }

    #[test]
    fn kings_move_any_diagonal_but_not_far() {
        let mut board = Board::empty();
        board.insert(Piece::king(3, 4, Player::Player1));
        for (tc, tr) in [(2, 3), (4, 3), (2, 5), (4, 5)] {
            assert_eq!(
                check(&board, Player::Player1, (3, 4), (tc, tr)).map(|m| m.kind),
                Ok(LegalMoveKind::Simple)
            );
        }
        assert_eq!(check(&board, Player::Player1, (3, 4), (6, 7)), Err(IllegalMove::TooFar));
    }

    #[test]
    fn jump_names_the_captured_piece() {
        let mut board = Board::empty();
        let victim = Piece::regular(3, 4, Player::Player2);
        board.insert(Piece::regular(2, 5, Player::Player1));
        board.insert(victim);

        let m = check(&board, Player::Player1, (2, 5), (4, 3)).expect("jump is legal");
        assert_eq!(m.kind, LegalMoveKind::Capture(victim));
        assert_eq!(m.captured(), Some(victim));
        // Validation does not touch the board.
        assert_eq!(board.piece_at(3, 4), Some(victim));
    }

    #[test]
    fn cannot_jump_own_piece() {
        let mut board = Board::empty();
        board.insert(Piece::regular(2, 5, Player::Player1));
        board.insert(Piece::regular(3, 4, Player::Player1));
        assert_eq!(check(&board, Player::Player1, (2, 5), (4, 3)), Err(IllegalMove::NothingToJump));
    }

    #[test]
    fn landing_on_far_row_crowns() {
        let mut board = Board::empty();
        board.insert(Piece::regular(1, 1, Player::Player1));
        let m = check(&board, Player::Player1, (1, 1), (0, 0)).expect("legal");
        assert_eq!(m.landed().rank, Rank::King);
    }

    #[test]
    fn forced_piece_restricts_selection() {
        let mut board = Board::empty();
        let forced = Piece::regular(4, 3, Player::Player1);
        board.insert(forced);
        board.insert(Piece::regular(0, 7, Player::Player1));
        let chain = CaptureChain { forced: Some(forced), ..CaptureChain::default() };

        assert_eq!(
            check_move(&board, Player::Player1, &chain, (0, 7), (1, 6)),
            Err(IllegalMove::WrongPieceInChain)
        );
        assert!(check_move(&board, Player::Player1, &chain, (4, 3), (5, 2)).is_ok());
    }

    #[test]
    fn continuation_detected_after_jump() {
        let mut board = Board::empty();
        let jumper = Piece::regular(4, 3, Player::Player1);
        board.insert(jumper);
        board.insert(Piece::regular(5, 2, Player::Player2));

        let mut chain = CaptureChain {
            last_capture: Some(Piece::regular(3, 4, Player::Player2)),
            ..CaptureChain::default()
        };
        assert!(chain.has_forced_continuation(&board, jumper));
        assert_eq!(chain.forced, Some(jumper));
    }

    #[test]
    fn no_continuation_without_a_capture() {
        let mut board = Board::empty();
        let jumper = Piece::regular(4, 3, Player::Player1);
        board.insert(jumper);
        board.insert(Piece::regular(5, 2, Player::Player2));

        let mut chain = CaptureChain { forced: Some(jumper), ..CaptureChain::default() };
        assert!(!chain.has_forced_continuation(&board, jumper));
        assert_eq!(chain.forced, None);
    }

    #[test]
    fn no_continuation_when_landing_blocked_or_backwards() {
        let mut board = Board::empty();
        let jumper = Piece::regular(4, 3, Player::Player1);
        board.insert(jumper);
        // Forward jump blocked by a piece on the landing square.
        board.insert(Piece::regular(5, 2, Player::Player2));
        board.insert(Piece::regular(6, 1, Player::Player2));
        // Backward jump available only to a king.
        board.insert(Piece::regular(5, 4, Player::Player2));

        let captured = Piece::regular(3, 4, Player::Player2);
        let mut chain = CaptureChain { last_capture: Some(captured), ..CaptureChain::default() };
        assert!(!chain.has_forced_continuation(&board, jumper));

        let king = Piece::king(4, 3, Player::Player1);
        board.remove(jumper);
        board.insert(king);
        assert!(chain.has_forced_continuation(&board, king));
    }

    #[test]
    fn jump_off_the_board_is_not_a_continuation() {
        let mut board = Board::empty();
        let jumper = Piece::regular(1, 2, Player::Player1);
        board.insert(jumper);
        board.insert(Piece::regular(0, 1, Player::Player2));
        let mut chain = CaptureChain {
            last_capture: Some(Piece::regular(2, 3, Player::Player2)),
            ..CaptureChain::default()
        };
        assert!(!chain.has_forced_continuation(&board, jumper));
    }

    /// Independent restatement of the nine movement rules.
    fn reference_legal(board: &Board, turn: Player, from: (i32, i32), to: (i32, i32)) -> bool {
        let Some(piece) = board.piece_at(from.0, from.1) else { return false };
        let in_range = |v: i32| (0..8).contains(&v);
        let dc = to.0 - from.0;
        let dr = to.1 - from.1;
        let forward_ok = match (piece.rank, piece.player) {
            (Rank::King, _) => true,
            (Rank::Regular, Player::Player1) => dr < 0,
            (Rank::Regular, Player::Player2) => dr > 0,
        };
        let jump_ok = dc.abs() != 2 || board
            .piece_at(from.0 + dc / 2, from.1 + dr / 2)
            .is_some_and(|o| o.player != piece.player);
        piece.player == turn
            && in_range(to.0)
            && in_range(to.1)
            && from != to
            && board.piece_at(to.0, to.1).is_none()
            && dc.abs() == dr.abs()
            && forward_ok
            && (dc.abs() == 1 || dc.abs() == 2)
            && jump_ok
    }

    #[test]
    fn validator_matches_reference_on_every_pair() {
        let mut board = Board::empty();
        board.insert(Piece::regular(2, 5, Player::Player1));
        board.insert(Piece::king(5, 2, Player::Player1));
        board.insert(Piece::regular(0, 1, Player::Player1));
        board.insert(Piece::regular(3, 4, Player::Player2));
        board.insert(Piece::regular(4, 3, Player::Player2));
        board.insert(Piece::king(6, 3, Player::Player2));
        board.insert(Piece::regular(1, 6, Player::Player2));

        let chain = CaptureChain::default();
        for turn in [Player::Player1, Player::Player2] {
            for fc in -1..9 {
                for fr in -1..9 {
                    for tc in -1..9 {
                        for tr in -1..9 {
                            let ours = check_move(&board, turn, &chain, (fc, fr), (tc, tr)).is_ok();
                            let reference = reference_legal(&board, turn, (fc, fr), (tc, tr));
                            assert_eq!(ours, reference, "{turn:?} ({fc},{fr}) -> ({tc},{tr})");
                        }
                    }
                }
            }
        }
    }
}
