use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const BOARD_LEN: usize = 9;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NotationError {
    #[error("Invalid move notation '{0}' (expected a board letter A-I followed by a cell 1-9)")]
    InvalidNotation(String),
    #[error("Sub-board {sub_board} and cell {cell} do not address a cell on the board")]
    OutOfRange { sub_board: usize, cell: usize },
}

// A cell address on the outer board. Both indices are always within 0..9.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Move {
    sub_board: usize,
    cell: usize,
}

impl Move {
    pub fn new(sub_board: usize, cell: usize) -> Result<Self, NotationError> {
        if sub_board >= BOARD_LEN || cell >= BOARD_LEN {
            return Err(NotationError::OutOfRange { sub_board, cell });
        }
        Ok(Move { sub_board, cell })
    }

    pub fn sub_board(&self) -> usize {
        self.sub_board
    }

    pub fn cell(&self) -> usize {
        self.cell
    }

    pub fn token(&self) -> String {
        self.to_string()
    }
}

pub fn board_letter(sub_board: usize) -> char {
    (b'A' + sub_board as u8) as char
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", board_letter(self.sub_board), self.cell + 1)
    }
}

impl FromStr for Move {
    type Err = NotationError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let invalid = || NotationError::InvalidNotation(token.to_string());
        let mut chars = token.chars();
        let (letter, digit) = match (chars.next(), chars.next(), chars.next()) {
            (Some(letter), Some(digit), None) => (letter.to_ascii_uppercase(), digit),
            _ => return Err(invalid()),
        };
        if !('A'..='I').contains(&letter) || !('1'..='9').contains(&digit) {
            return Err(invalid());
        }
        Ok(Move {
            sub_board: letter as usize - 'A' as usize,
            cell: digit as usize - '1' as usize,
        })
    }
}

impl TryFrom<String> for Move {
    type Error = NotationError;

    fn try_from(token: String) -> Result<Self, Self::Error> {
        token.parse()
    }
}

impl From<Move> for String {
    fn from(mv: Move) -> Self {
        mv.to_string()
    }
}
