use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::piece::{Piece, Player, Rank};

pub const BOARD_SIZE: usize = 8;

/// Player1 starting squares as (col, row), back row first.
const PLAYER1_START: [(usize, usize); 12] = [
    (0, 7), (2, 7), (4, 7), (6, 7),
    (1, 6), (3, 6), (5, 6), (7, 6),
    (0, 5), (2, 5), (4, 5), (6, 5),
];

/// Player2 starting squares as (col, row), back row first.
const PLAYER2_START: [(usize, usize); 12] = [
    (1, 0), (3, 0), (5, 0), (7, 0),
    (0, 1), (2, 1), (4, 1), (6, 1),
    (1, 2), (3, 2), (5, 2), (7, 2),
];

/// The set of live pieces, indexed by position. `squares[row][col]` holds the
/// piece whose own `(col, row)` is that cell.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(try_from = "BoardSnapshot")]
pub struct Board {
    squares: [[Option<Piece>; BOARD_SIZE]; BOARD_SIZE],
}

/// Unchecked serialized form of a [`Board`].
#[derive(Deserialize)]
struct BoardSnapshot {
    squares: [[Option<Piece>; BOARD_SIZE]; BOARD_SIZE],
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("square ({col}, {row}) holds a piece recorded at ({piece_col}, {piece_row})")]
    Misplaced {
        col: usize,
        row: usize,
        piece_col: usize,
        piece_row: usize,
    },
}

impl TryFrom<BoardSnapshot> for Board {
    type Error = BoardError;

    fn try_from(snapshot: BoardSnapshot) -> Result<Self, Self::Error> {
        for (row, cells) in snapshot.squares.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                if let Some(p) = cell {
                    if p.position() != (col, row) {
                        return Err(BoardError::Misplaced {
                            col,
                            row,
                            piece_col: p.col,
                            piece_row: p.row,
                        });
                    }
                }
            }
        }
        Ok(Board {
            squares: snapshot.squares,
        })
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create an empty board with no pieces. Useful for setting up test positions.
    pub fn empty() -> Self {
        Board {
            squares: [[None; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// The standard starting position: twelve regular pieces per side on the
    /// dark squares of the three rows nearest each player.
    pub fn new() -> Self {
        let mut board = Board::empty();
        for &(col, row) in &PLAYER1_START {
            board.insert(Piece::regular(col, row, Player::Player1));
        }
        for &(col, row) in &PLAYER2_START {
            board.insert(Piece::regular(col, row, Player::Player2));
        }
        board
    }

    pub fn in_bounds(col: i32, row: i32) -> bool {
        (0..BOARD_SIZE as i32).contains(&col) && (0..BOARD_SIZE as i32).contains(&row)
    }

    /// The piece on `(col, row)`. Out-of-bounds coordinates hold nothing.
    pub fn piece_at(&self, col: i32, row: i32) -> Option<Piece> {
        if !Self::in_bounds(col, row) {
            return None;
        }
        self.squares[row as usize][col as usize]
    }

    pub fn is_empty_at(&self, col: i32, row: i32) -> bool {
        self.piece_at(col, row).is_none()
    }

    /// Place a piece on its own square. The square must be empty and the
    /// position on the board; deserialized boards are checked for the latter.
    pub fn insert(&mut self, piece: Piece) {
        let cell = &mut self.squares[piece.row][piece.col];
        debug_assert!(cell.is_none(), "square ({}, {}) already occupied", piece.col, piece.row);
        *cell = Some(piece);
    }

    /// Remove exactly `piece`. Removing a piece that is not on the board is a
    /// programmer error; in release builds it leaves the board untouched.
    pub fn remove(&mut self, piece: Piece) {
        let cell = &mut self.squares[piece.row][piece.col];
        debug_assert_eq!(*cell, Some(piece), "removing a piece that is not on the board");
        if *cell == Some(piece) {
            *cell = None;
        }
    }

    /// All live pieces in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = Piece> + '_ {
        self.squares.iter().flat_map(|row| row.iter().flatten().copied())
    }

    pub fn pieces_of(&self, player: Player) -> impl Iterator<Item = Piece> + '_ {
        self.pieces().filter(move |p| p.player == player)
    }

    pub fn count(&self, player: Player) -> usize {
        self.pieces_of(player).count()
    }

    pub fn has_pieces(&self, player: Player) -> bool {
        self.pieces_of(player).next().is_some()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " ")?;
        for col in 0..BOARD_SIZE {
            write!(f, " {col}")?;
        }
        writeln!(f)?;
        for (r, row) in self.squares.iter().enumerate() {
            write!(f, "{r}")?;
            for cell in row {
                let c = match cell {
                    Some(p) => match (p.player, p.rank) {
                        (Player::Player1, Rank::Regular) => 'r',
                        (Player::Player1, Rank::King) => 'R',
                        (Player::Player2, Rank::Regular) => 'b',
                        (Player::Player2, Rank::King) => 'B',
                    },
                    None => '.',
                };
                write!(f, " {c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
