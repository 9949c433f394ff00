//! Ultimate Game Notation (UGN).
//!
//! A UGN move is a move token followed by optional annotations:
//!
//! - `!` the move won its sub-board
//! - `/` the move drew its sub-board
//! - `%` the move drew the game
//! - `#` the move won the game
//!
//! A UGN record is a block of `[Tag "value"]` headers, a blank line, the moves
//! two per line, and a result line (`1-0`, `0-1`, `1/2-1/2` or `*`). Tag values
//! escape `\` and `"` with a backslash and never contain control characters.

use crate::uttt::game_state::Winner;
use crate::uttt::notation::{Move, NotationError};
use crate::uttt::player::Symbol;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const RESULT_LINES: [&str; 4] = ["1-0", "0-1", "1/2-1/2", "*"];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum UgnError {
    #[error("Invalid UGN move: {0}")]
    Move(#[from] NotationError),
    #[error("Invalid annotation '{symbol}' in UGN move {token}")]
    InvalidAnnotation { token: String, symbol: char },
    #[error("Malformed UGN tag line: {0}")]
    MalformedTag(String),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct Annotations {
    pub small_win: bool,
    pub small_draw: bool,
    pub game_draw: bool,
    pub game_win: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UgnMove {
    mv: Move,
    annotations: Annotations,
}

impl UgnMove {
    pub fn new(mv: Move, annotations: Annotations) -> Self {
        UgnMove { mv, annotations }
    }

    pub fn get(&self) -> Move {
        self.mv
    }

    pub fn annotations(&self) -> Annotations {
        self.annotations
    }
}

impl From<Move> for UgnMove {
    fn from(mv: Move) -> Self {
        UgnMove::new(mv, Annotations::default())
    }
}

impl fmt::Display for UgnMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mv)?;
        let Annotations {
            small_win,
            small_draw,
            game_draw,
            game_win,
        } = self.annotations;
        for (set, symbol) in [(small_win, '!'), (small_draw, '/'), (game_draw, '%'), (game_win, '#')] {
            if set {
                write!(f, "{}", symbol)?;
            }
        }
        Ok(())
    }
}

impl FromStr for UgnMove {
    type Err = UgnError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let token = token.trim();
        let split = token.char_indices().nth(2).map_or(token.len(), |(idx, _)| idx);
        let (mv, symbols) = token.split_at(split);
        let mv: Move = mv.parse()?;
        let mut annotations = Annotations::default();
        for symbol in symbols.chars() {
            match symbol {
                '!' => annotations.small_win = true,
                '/' => annotations.small_draw = true,
                '%' => annotations.game_draw = true,
                '#' => annotations.game_win = true,
                _ => {
                    return Err(UgnError::InvalidAnnotation {
                        token: token.to_string(),
                        symbol,
                    })
                }
            }
        }
        Ok(UgnMove { mv, annotations })
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct UgnRecord {
    pub game_id: String,
    pub player_x: String,
    pub player_o: String,
    pub date: Option<String>,
    pub time: Option<String>,
    pub winner: Option<Winner>,
    pub comment: Option<String>,
    pub moves: Vec<UgnMove>,
}

impl UgnRecord {
    fn result_tag(&self) -> &'static str {
        match self.winner {
            Some(Winner::Player(Symbol::X)) => "X",
            Some(Winner::Player(Symbol::O)) => "O",
            Some(Winner::Draw) => "Draw",
            None => "In Progress",
        }
    }

    fn result_line(&self) -> &'static str {
        match self.winner {
            Some(Winner::Player(Symbol::X)) => RESULT_LINES[0],
            Some(Winner::Player(Symbol::O)) => RESULT_LINES[1],
            Some(Winner::Draw) => RESULT_LINES[2],
            None => RESULT_LINES[3],
        }
    }

    // The game id comes from the server, so only a safe subset of it reaches the file system
    pub fn file_name(&self) -> String {
        let stem: String = self
            .game_id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        if stem.is_empty() {
            "game.ugn".to_string()
        } else {
            format!("{}.ugn", stem)
        }
    }
}

impl fmt::Display for UgnRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_tag(f, "GameID", &self.game_id)?;
        if let Some(date) = &self.date {
            write_tag(f, "Date", date)?;
        }
        if let Some(time) = &self.time {
            write_tag(f, "Time", time)?;
        }
        write_tag(f, "PlayerX", &self.player_x)?;
        write_tag(f, "PlayerO", &self.player_o)?;
        write_tag(f, "Result", self.result_tag())?;
        if let Some(comment) = &self.comment {
            write_tag(f, "Comment", comment)?;
        }
        writeln!(f)?;
        for (idx, mv) in self.moves.iter().enumerate() {
            if idx > 0 && idx % 2 == 0 {
                writeln!(f)?;
            } else if idx > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", mv)?;
        }
        writeln!(f)?;
        writeln!(f, "{}", self.result_line())
    }
}

fn write_tag(f: &mut fmt::Formatter<'_>, key: &str, value: &str) -> fmt::Result {
    write!(f, "[{} \"", key)?;
    for c in value.chars() {
        match c {
            '\\' | '"' => write!(f, "\\{}", c)?,
            c if c.is_control() => write!(f, " ")?,
            c => write!(f, "{}", c)?,
        }
    }
    writeln!(f, "\"]")
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.extend(chars.next()),
            c => out.push(c),
        }
    }
    out
}

fn parse_tag(line: &str) -> Result<(&str, String), UgnError> {
    let malformed = || UgnError::MalformedTag(line.to_string());
    let inner = line
        .strip_prefix('[')
        .and_then(|l| l.strip_suffix(']'))
        .ok_or_else(malformed)?;
    let (key, value) = inner.split_once(char::is_whitespace).ok_or_else(malformed)?;
    let value = value
        .trim()
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or_else(malformed)?;
    Ok((key, unescape(value)))
}

impl FromStr for UgnRecord {
    type Err = UgnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut record = UgnRecord::default();
        let mut lines = s.lines().map(str::trim);
        for line in lines.by_ref() {
            if line.is_empty() {
                break;
            }
            let (key, value) = parse_tag(line)?;
            match key {
                "GameID" => record.game_id = value,
                "Date" => record.date = Some(value),
                "Time" => record.time = Some(value),
                "PlayerX" => record.player_x = value,
                "PlayerO" => record.player_o = value,
                "Result" => record.winner = value.parse().ok(),
                "Comment" => record.comment = Some(value),
                // Unknown tags are skipped
                _ => {}
            }
        }
        for line in lines {
            if line.is_empty() || RESULT_LINES.contains(&line) {
                continue;
            }
            for token in line.split_whitespace() {
                record.moves.push(token.parse()?);
            }
        }
        Ok(record)
    }
}
