use crate::uttt::{
    ActiveBoard, Cell, GameState, GameStatus, Move, NotationError, Outcome, Symbol, BOARD_LEN,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("Unrecognized message type '{0}'")]
    UnrecognizedMessageType(String),
    #[error("Malformed {kind} payload: {reason}")]
    MalformedPayload { kind: String, reason: String },
}

#[derive(Serialize, Deserialize, Debug)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: Value,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct WelcomePayload {
    #[serde(default)]
    pub player_id: String,
    #[serde(default)]
    pub player_name: String,
    pub message: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SubBoardPayload {
    pub cells: [Cell; BOARD_LEN],
    #[serde(default)]
    pub state: Option<Outcome>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BoardStatePayload {
    pub boards: [SubBoardPayload; BOARD_LEN],
    pub board_states: [Outcome; BOARD_LEN],
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GameStatePayload {
    pub game_id: String,
    pub board: BoardStatePayload,
    pub current_turn: Symbol,
    pub your_symbol: Symbol,
    pub active_board: ActiveBoard,
    pub game_status: GameStatus,
    #[serde(default)]
    pub winner: Option<String>,
    pub player_x_name: String,
    pub player_o_name: String,
    #[serde(default)]
    pub ugn_moves: Option<Vec<String>>,
    pub is_your_turn: bool,
}

// Echo of a move the server accepted. Informational only, the board is
// updated by the `game_state` that follows it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MovePayload {
    pub player_name: String,
    pub player_symbol: Symbol,
    #[serde(rename = "move")]
    pub mv: Move,
    #[serde(default)]
    pub board_index: Option<usize>,
    #[serde(default)]
    pub position: Option<usize>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TextPayload {
    pub message: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GameOverPayload {
    #[serde(default)]
    pub winner: String,
    #[serde(default)]
    pub winner_name: String,
    pub message: String,
    #[serde(default)]
    pub comment: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DrawOfferPayload {
    #[serde(default)]
    pub offered_by: String,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ServerMessage {
    Welcome(WelcomePayload),
    GameState(Box<GameState>),
    Move(MovePayload),
    Error(TextPayload),
    Info(TextPayload),
    GameOver(GameOverPayload),
    DrawOffer(DrawOfferPayload),
}

impl ServerMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            ServerMessage::Welcome(_) => "welcome",
            ServerMessage::GameState(_) => "game_state",
            ServerMessage::Move(_) => "move",
            ServerMessage::Error(_) => "error",
            ServerMessage::Info(_) => "info",
            ServerMessage::GameOver(_) => "game_over",
            ServerMessage::DrawOffer(_) => "draw_offer",
        }
    }
}

fn parse_payload<T: DeserializeOwned>(kind: &str, payload: Value) -> Result<T, DecodeError> {
    serde_json::from_value(payload).map_err(|err| DecodeError::MalformedPayload {
        kind: kind.to_string(),
        reason: err.to_string(),
    })
}

impl FromStr for ServerMessage {
    type Err = DecodeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let Envelope { kind, payload } =
            serde_json::from_str(raw).map_err(|err| DecodeError::MalformedPayload {
                kind: "envelope".to_string(),
                reason: err.to_string(),
            })?;
        let message = match kind.as_str() {
            "welcome" => ServerMessage::Welcome(parse_payload(&kind, payload)?),
            "game_state" => {
                let snapshot: GameStatePayload = parse_payload(&kind, payload)?;
                let game_state = GameState::try_from(snapshot).map_err(|err| {
                    DecodeError::MalformedPayload {
                        kind: kind.clone(),
                        reason: err.to_string(),
                    }
                })?;
                ServerMessage::GameState(Box::new(game_state))
            }
            "move" => ServerMessage::Move(parse_payload(&kind, payload)?),
            "error" => ServerMessage::Error(parse_payload(&kind, payload)?),
            "info" => ServerMessage::Info(parse_payload(&kind, payload)?),
            "game_over" => ServerMessage::GameOver(parse_payload(&kind, payload)?),
            "draw_offer" => ServerMessage::DrawOffer(parse_payload(&kind, payload)?),
            other => return Err(DecodeError::UnrecognizedMessageType(other.to_string())),
        };
        Ok(message)
    }
}

pub fn decode(raw: &str) -> Result<ServerMessage, DecodeError> {
    raw.parse()
}

// Plain-text commands understood by the server
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Command {
    Move(Move),
    Resign,
    OfferDraw,
    AcceptDraw,
    DeclineDraw,
    Status,
    Help,
    Board,
    Quit,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Move(mv) => write!(f, "{}", mv),
            Command::Resign => write!(f, "R"),
            Command::OfferDraw => write!(f, "DRAW"),
            Command::AcceptDraw => write!(f, "ACCEPT_DRAW"),
            Command::DeclineDraw => write!(f, "DECLINE_DRAW"),
            Command::Status => write!(f, "status"),
            Command::Help => write!(f, "help"),
            Command::Board => write!(f, "board"),
            Command::Quit => write!(f, "quit"),
        }
    }
}

impl FromStr for Command {
    type Err = NotationError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        let command = match input.to_ascii_uppercase().as_str() {
            "R" | "RESIGN" => Command::Resign,
            "DRAW" => Command::OfferDraw,
            "ACCEPT_DRAW" | "ACCEPT" => Command::AcceptDraw,
            "DECLINE_DRAW" | "DECLINE" => Command::DeclineDraw,
            "STATUS" => Command::Status,
            "HELP" | "?" => Command::Help,
            "BOARD" | "SHOW" => Command::Board,
            "QUIT" | "EXIT" => Command::Quit,
            _ => Command::Move(input.parse()?),
        };
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_board_json() -> Value {
        let sub_board = serde_json::json!({ "cells": vec![""; 9], "state": "undecided" });
        serde_json::json!({
            "boards": vec![sub_board; 9],
            "board_states": vec!["undecided"; 9],
        })
    }

    fn game_state_json(active_board: i64) -> String {
        serde_json::json!({
            "type": "game_state",
            "payload": {
                "game_id": "g1",
                "your_symbol": "X",
                "player_x_name": "alice",
                "player_o_name": "bob",
                "current_turn": "X",
                "game_status": "in_progress",
                "is_your_turn": true,
                "active_board": active_board,
                "board": empty_board_json(),
                "ugn_moves": [],
            }
        })
        .to_string()
    }

    #[test]
    fn test_decode_text_messages() {
        let welcome = decode(r#"{"type":"welcome","payload":{"player_id":"p1","player_name":"alice","message":"hi"}}"#);
        assert!(matches!(welcome, Ok(ServerMessage::Welcome(WelcomePayload { message, .. })) if message == "hi"));

        let error = decode(r#"{"type":"error","payload":{"message":"Not your turn"}}"#).unwrap();
        assert_eq!(
            error,
            ServerMessage::Error(TextPayload {
                message: "Not your turn".to_string()
            })
        );
        assert_eq!(error.kind(), "error");

        let info = decode(r#"{"type":"info","payload":{"message":"Draw offer sent"}}"#).unwrap();
        assert_eq!(info.kind(), "info");

        let draw_offer =
            decode(r#"{"type":"draw_offer","payload":{"message":"Opponent offers a draw"}}"#)
                .unwrap();
        assert_eq!(
            draw_offer,
            ServerMessage::DrawOffer(DrawOfferPayload {
                offered_by: String::new(),
                message: "Opponent offers a draw".to_string()
            })
        );

        let game_over = decode(
            r#"{"type":"game_over","payload":{"winner":"X","winner_name":"alice","message":"alice wins by resignation!","comment":"resignation"}}"#,
        )
        .unwrap();
        assert!(matches!(game_over, ServerMessage::GameOver(GameOverPayload { ref comment, .. }) if comment == "resignation"));
    }

    #[test]
    fn test_decode_move() {
        let msg = decode(
            r#"{"type":"move","payload":{"player_name":"bob","player_symbol":"O","move":"E5","board_index":4,"position":4}}"#,
        )
        .unwrap();
        match msg {
            ServerMessage::Move(payload) => {
                assert_eq!(payload.player_symbol, Symbol::O);
                assert_eq!(payload.mv, Move::new(4, 4).unwrap());
            }
            other => panic!("expected move, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_game_state() {
        match decode(&game_state_json(-1)).unwrap() {
            ServerMessage::GameState(game) => {
                assert_eq!(game.game_id(), "g1");
                assert_eq!(game.board().active(), ActiveBoard::Any);
            }
            other => panic!("expected game_state, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_unrecognized_type() {
        assert_eq!(
            decode(r#"{"type":"ping","payload":{}}"#),
            Err(DecodeError::UnrecognizedMessageType("ping".to_string()))
        );
    }

    #[test]
    fn test_decode_malformed_payloads() {
        let cases = [
            r#"{"type":"error","payload":{"text":"missing message"}}"#.to_string(),
            r#"{"type":"info"}"#.to_string(),
            r#"{"type":"move","payload":{"player_name":"bob","player_symbol":"O","move":"Z9"}}"#
                .to_string(),
            game_state_json(9),
            "not json".to_string(),
            r#"{"payload":{}}"#.to_string(),
        ];
        for raw in cases {
            assert!(
                matches!(decode(&raw), Err(DecodeError::MalformedPayload { .. })),
                "{} should be malformed",
                raw
            );
        }
    }

    #[test]
    fn test_command_tokens() {
        let mv = Move::new(2, 6).unwrap();
        assert_eq!(Command::Move(mv).to_string(), "C7");
        assert_eq!(Command::Resign.to_string(), "R");
        assert_eq!(Command::OfferDraw.to_string(), "DRAW");
        assert_eq!(Command::AcceptDraw.to_string(), "ACCEPT_DRAW");
        assert_eq!(Command::DeclineDraw.to_string(), "DECLINE_DRAW");
        assert_eq!(Command::Status.to_string(), "status");
        assert_eq!(Command::Help.to_string(), "help");
        assert_eq!(Command::Board.to_string(), "board");
        assert_eq!(Command::Quit.to_string(), "quit");
    }

    #[test]
    fn test_parse_command() {
        assert_eq!("r".parse(), Ok(Command::Resign));
        assert_eq!("resign".parse(), Ok(Command::Resign));
        assert_eq!("Draw".parse(), Ok(Command::OfferDraw));
        assert_eq!("accept_draw".parse(), Ok(Command::AcceptDraw));
        assert_eq!("decline".parse(), Ok(Command::DeclineDraw));
        assert_eq!("?".parse(), Ok(Command::Help));
        assert_eq!(" show ".parse(), Ok(Command::Board));
        assert_eq!("exit".parse(), Ok(Command::Quit));
        assert_eq!("e5".parse(), Ok(Command::Move(Move::new(4, 4).unwrap())));
        assert!("J1".parse::<Command>().is_err());
    }
}
