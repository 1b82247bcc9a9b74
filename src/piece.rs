use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    /// Starts on rows 5-7 and moves toward row 0.
    Player1,
    /// Starts on rows 0-2 and moves toward row 7.
    Player2,
}

impl Player {
    pub fn opposite(self) -> Player {
        match self {
            Player::Player1 => Player::Player2,
            Player::Player2 => Player::Player1,
        }
    }

    /// Row delta of a forward step for a regular piece.
    pub fn forward(self) -> i32 {
        match self {
            Player::Player1 => -1,
            Player::Player2 => 1,
        }
    }

    /// The row on which this player's regular pieces are crowned.
    pub fn promotion_row(self) -> usize {
        match self {
            Player::Player1 => 0,
            Player::Player2 => 7,
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum Rank {
    Regular,
    King,
}

/// A piece on the board. Pieces are values: a move replaces the old piece
/// with a new one at the destination rather than mutating it.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub col: usize,
    pub row: usize,
    pub player: Player,
    pub rank: Rank,
}

impl Piece {
    pub fn new(col: usize, row: usize, player: Player, rank: Rank) -> Self {
        Piece { col, row, player, rank }
    }

    pub fn regular(col: usize, row: usize, player: Player) -> Self {
        Piece::new(col, row, player, Rank::Regular)
    }

    pub fn king(col: usize, row: usize, player: Player) -> Self {
        Piece::new(col, row, player, Rank::King)
    }

    pub fn is_king(&self) -> bool {
        self.rank == Rank::King
    }

    pub fn position(&self) -> (usize, usize) {
        (self.col, self.row)
    }

    /// The same piece relocated to `(col, row)`, crowned if it lands on its
    /// promotion row. Kings stay kings.
    pub fn moved_to(&self, col: usize, row: usize) -> Piece {
        let rank = if self.is_king() || row == self.player.promotion_row() {
            Rank::King
        } else {
            Rank::Regular
        };
        Piece::new(col, row, self.player, rank)
    }
}
