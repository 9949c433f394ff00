use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Symbol {
    X,
    O,
}

impl Symbol {
    pub fn other(&self) -> Symbol {
        match self {
            Symbol::X => Symbol::O,
            Symbol::O => Symbol::X,
        }
    }

    fn index(&self) -> usize {
        match self {
            Symbol::X => 0,
            Symbol::O => 1,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::X => write!(f, "X"),
            Symbol::O => write!(f, "O"),
        }
    }
}

// Display names of both players. The first element is X's name and the second is O's.
#[derive(Clone, Debug, PartialEq)]
pub struct Players([String; 2]);

impl Players {
    pub fn new(player_x: String, player_o: String) -> Self {
        Players([player_x, player_o])
    }
}

impl Index<Symbol> for Players {
    type Output = String;

    fn index(&self, symbol: Symbol) -> &Self::Output {
        &self.0[symbol.index()]
    }
}
