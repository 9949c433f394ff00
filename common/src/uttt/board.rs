use crate::uttt::notation::{Move, BOARD_LEN};
use crate::uttt::player::Symbol;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Active board {0} is outside of -1..=8")]
pub struct ActiveBoardError(i8);

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    #[serde(rename = "")]
    Empty,
    X,
    O,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn symbol(&self) -> Option<Symbol> {
        match self {
            Cell::Empty => None,
            Cell::X => Some(Symbol::X),
            Cell::O => Some(Symbol::O),
        }
    }
}

// Result of a single sub-board as reported by the server. Never derived from the cells here.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Outcome {
    #[default]
    #[serde(rename = "undecided")]
    Undecided,
    #[serde(rename = "X")]
    WonByX,
    #[serde(rename = "O")]
    WonByO,
    #[serde(rename = "draw")]
    Draw,
}

impl Outcome {
    pub fn is_decided(&self) -> bool {
        !matches!(self, Outcome::Undecided)
    }
}

// -1 on the wire means the mover may pick any undecided sub-board
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, Default)]
#[serde(try_from = "i8", into = "i8")]
pub enum ActiveBoard {
    #[default]
    Any,
    Board(usize),
}

impl TryFrom<i8> for ActiveBoard {
    type Error = ActiveBoardError;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(ActiveBoard::Any),
            0..=8 => Ok(ActiveBoard::Board(value as usize)),
            _ => Err(ActiveBoardError(value)),
        }
    }
}

impl From<ActiveBoard> for i8 {
    fn from(active: ActiveBoard) -> Self {
        match active {
            ActiveBoard::Any => -1,
            ActiveBoard::Board(idx) => idx as i8,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SubBoard {
    cells: [Cell; BOARD_LEN],
    outcome: Outcome,
}

impl SubBoard {
    pub fn new(cells: [Cell; BOARD_LEN], outcome: Outcome) -> Self {
        SubBoard { cells, outcome }
    }

    pub fn cells(&self) -> &[Cell; BOARD_LEN] {
        &self.cells
    }

    pub fn cell(&self, idx: usize) -> Cell {
        self.cells[idx]
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Board {
    sub_boards: [SubBoard; BOARD_LEN],
    active: ActiveBoard,
}

impl Board {
    pub fn new(sub_boards: [SubBoard; BOARD_LEN], active: ActiveBoard) -> Self {
        Board { sub_boards, active }
    }

    pub fn sub_boards(&self) -> &[SubBoard; BOARD_LEN] {
        &self.sub_boards
    }

    pub fn sub_board(&self, idx: usize) -> &SubBoard {
        &self.sub_boards[idx]
    }

    pub fn cell(&self, mv: Move) -> Cell {
        self.sub_boards[mv.sub_board()].cell(mv.cell())
    }

    pub fn outcome(&self, sub_board: usize) -> Outcome {
        self.sub_boards[sub_board].outcome()
    }

    pub fn active(&self) -> ActiveBoard {
        self.active
    }

    // The only mutator: the whole board is swapped for an authoritative snapshot
    pub fn replace_with(&mut self, snapshot: Board) {
        *self = snapshot;
    }
}
