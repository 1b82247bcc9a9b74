use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rules::LegalMove;

/// A move request as (col, row) pairs. Coordinates are not range-checked
/// here; the game session rejects anything off the board.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: (i32, i32),
    pub to: (i32, i32),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseMoveError {
    #[error("expected 4 fields separated by ':', got {0}")]
    FieldCount(usize),
    #[error("invalid coordinate {0:?}")]
    InvalidCoordinate(String),
}

impl Move {
    pub fn new(from_col: i32, from_row: i32, to_col: i32, to_row: i32) -> Self {
        Move {
            from: (from_col, from_row),
            to: (to_col, to_row),
        }
    }

    pub fn from_legal(m: &LegalMove) -> Self {
        Move::new(m.piece.col as i32, m.piece.row as i32, m.to.0 as i32, m.to.1 as i32)
    }

    /// A request naming the same square twice; during a capture chain this
    /// ends the chain.
    pub fn is_stationary(&self) -> bool {
        self.from == self.to
    }
}

/// Peer wire form: `fromCol:fromRow:toCol:toRow`, e.g. "1:6:2:5".
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}:{}", self.from.0, self.from.1, self.to.0, self.to.1)
    }
}

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.trim().split(':').collect();
        if fields.len() != 4 {
            return Err(ParseMoveError::FieldCount(fields.len()));
        }
        let mut coords = [0i32; 4];
        for (slot, field) in coords.iter_mut().zip(&fields) {
            *slot = field
                .trim()
                .parse()
                .map_err(|_| ParseMoveError::InvalidCoordinate(field.to_string()))?;
        }
        let [fc, fr, tc, tr] = coords;
        Ok(Move::new(fc, fr, tc, tr))
    }
}
