use crate::messages::{BoardStatePayload, GameStatePayload};
use crate::uttt::board::{Board, SubBoard};
use crate::uttt::input::{IllegalMove, ValidMove};
use crate::uttt::notation::Move;
use crate::uttt::player::{Players, Symbol};
use crate::uttt::ugn::{UgnError, UgnMove, UgnRecord};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SnapshotError {
    #[error("Unknown winner '{0}'")]
    UnknownWinner(String),
    #[error("Invalid move history: {0}")]
    MoveHistory(#[from] UgnError),
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    Finished,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Winner {
    Player(Symbol),
    Draw,
}

impl FromStr for Winner {
    type Err = SnapshotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "X" | "x" => Ok(Winner::Player(Symbol::X)),
            "O" | "o" => Ok(Winner::Player(Symbol::O)),
            "Draw" | "draw" => Ok(Winner::Draw),
            _ => Err(SnapshotError::UnknownWinner(s.to_string())),
        }
    }
}

// Client-side mirror of one game, rebuilt from every `game_state` snapshot
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    game_id: String,
    players: Players,
    your_symbol: Symbol,
    current_turn: Symbol,
    is_your_turn: bool,
    status: GameStatus,
    winner: Option<Winner>,
    board: Board,
    moves: Vec<UgnMove>,
}

impl GameState {
    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    pub fn players(&self) -> &Players {
        &self.players
    }

    pub fn your_symbol(&self) -> Symbol {
        self.your_symbol
    }

    pub fn current_turn(&self) -> Symbol {
        self.current_turn
    }

    pub fn is_your_turn(&self) -> bool {
        self.is_your_turn
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status == GameStatus::Finished
    }

    pub fn winner(&self) -> Option<Winner> {
        self.winner
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn moves(&self) -> &[UgnMove] {
        &self.moves
    }

    pub fn validate(&self, mv: Move) -> Result<ValidMove, IllegalMove> {
        ValidMove::new(mv, &self.board, self.is_your_turn, self.status)
    }

    // Every field is taken from the snapshot; nothing survives from the previous state
    pub fn replace_with(&mut self, snapshot: GameState) {
        let GameState {
            game_id,
            players,
            your_symbol,
            current_turn,
            is_your_turn,
            status,
            winner,
            board,
            moves,
        } = snapshot;
        self.game_id = game_id;
        self.players = players;
        self.your_symbol = your_symbol;
        self.current_turn = current_turn;
        self.is_your_turn = is_your_turn;
        self.status = status;
        self.winner = winner;
        self.board.replace_with(board);
        self.moves = moves;
    }

    pub fn ugn_record(&self, comment: Option<String>) -> UgnRecord {
        UgnRecord {
            game_id: self.game_id.clone(),
            player_x: self.players[Symbol::X].clone(),
            player_o: self.players[Symbol::O].clone(),
            date: None,
            time: None,
            winner: self.winner,
            comment,
            moves: self.moves.clone(),
        }
    }
}

impl TryFrom<GameStatePayload> for GameState {
    type Error = SnapshotError;

    fn try_from(payload: GameStatePayload) -> Result<Self, Self::Error> {
        let GameStatePayload {
            game_id,
            board,
            current_turn,
            your_symbol,
            active_board,
            game_status,
            winner,
            player_x_name,
            player_o_name,
            ugn_moves,
            is_your_turn,
        } = payload;

        // A winner is only meaningful once the server has finished the game
        let winner = match (game_status, winner.as_deref()) {
            (GameStatus::Finished, Some(w)) if !w.is_empty() => Some(w.parse()?),
            _ => None,
        };
        let moves = ugn_moves
            .unwrap_or_default()
            .iter()
            .map(|token| token.parse())
            .collect::<Result<Vec<UgnMove>, UgnError>>()?;
        let BoardStatePayload {
            boards,
            board_states,
        } = board;
        let sub_boards = std::array::from_fn(|idx| SubBoard::new(boards[idx].cells, board_states[idx]));

        Ok(GameState {
            game_id,
            players: Players::new(player_x_name, player_o_name),
            your_symbol,
            current_turn,
            is_your_turn,
            status: game_status,
            winner,
            board: Board::new(sub_boards, active_board),
            moves,
        })
    }
}
