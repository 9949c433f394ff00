use crate::client::{SendError, SendMsg};
use crate::events::{Diagnostic, MoveNotice, UiEvent};
use common::messages::{Command, GameOverPayload, ServerMessage};
use common::{GameState, IllegalMove, Move, NotationError, Symbol, UgnRecord, ValidMove};
use std::mem;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActionError {
    #[error("{0}")]
    Notation(#[from] NotationError),
    #[error("Illegal move: {0}")]
    Illegal(#[from] IllegalMove),
    #[error("Not connected to server")]
    NotConnected,
    #[error("No game in progress")]
    NoActiveGame,
    #[error("No draw offer pending")]
    NoDrawOffer,
}

impl From<SendError> for ActionError {
    fn from(_: SendError) -> Self {
        ActionError::NotConnected
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Phase {
    Disconnected,
    AwaitingFirstSnapshot,
    Active(GameState),
    // The finished game is kept around so it can still be displayed
    Concluded(GameState),
}

#[derive(Clone, Debug, PartialEq)]
pub struct DrawOffer {
    pub offered_by: String,
    // The local player, who has to accept or decline
    pub responder: Option<Symbol>,
}

#[derive(Debug)]
pub struct Session {
    phase: Phase,
    draw_offer: Option<DrawOffer>,
    activity: Vec<MoveNotice>,
    game_over: Option<GameOverPayload>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Session {
            phase: Phase::Disconnected,
            draw_offer: None,
            activity: Vec::new(),
            game_over: None,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn game(&self) -> Option<&GameState> {
        match &self.phase {
            Phase::Active(game) | Phase::Concluded(game) => Some(game),
            Phase::Disconnected | Phase::AwaitingFirstSnapshot => None,
        }
    }

    pub fn draw_offer(&self) -> Option<&DrawOffer> {
        self.draw_offer.as_ref()
    }

    pub fn activity(&self) -> &[MoveNotice] {
        &self.activity
    }

    // UGN record of the current game once the server has finished it
    pub fn record(&self) -> Option<UgnRecord> {
        match &self.phase {
            Phase::Concluded(game) => {
                let comment = self
                    .game_over
                    .as_ref()
                    .map(|g| g.comment.clone())
                    .filter(|c| !c.is_empty());
                Some(game.ugn_record(comment))
            }
            _ => None,
        }
    }

    pub fn connected(&mut self) {
        if !matches!(self.phase, Phase::Disconnected) {
            warn!("connected while a session was already open");
            return;
        }
        info!("awaiting first game snapshot");
        self.phase = Phase::AwaitingFirstSnapshot;
    }

    pub fn disconnected(&mut self) {
        info!("session torn down");
        self.phase = Phase::Disconnected;
        self.draw_offer = None;
        self.activity.clear();
        self.game_over = None;
    }

    #[tracing::instrument(skip(self))]
    pub fn handle_message(&mut self, raw: &str) -> Vec<UiEvent> {
        match raw.parse::<ServerMessage>() {
            Ok(message) => {
                info!("received {} message", message.kind());
                vec![self.apply(message)]
            }
            Err(error) => {
                warn!("failed to decode server message: {}", error);
                vec![UiEvent::Diagnostic(Diagnostic::Undecodable {
                    raw: raw.to_string(),
                    error,
                })]
            }
        }
    }

    pub fn apply(&mut self, message: ServerMessage) -> UiEvent {
        match message {
            ServerMessage::Welcome(welcome) => UiEvent::Greeting(welcome.message),
            ServerMessage::GameState(snapshot) => self.apply_snapshot(*snapshot),
            ServerMessage::Move(payload) => {
                // The board only changes through the next game_state
                let notice = MoveNotice {
                    player_name: payload.player_name,
                    symbol: payload.player_symbol,
                    mv: payload.mv,
                };
                self.activity.push(notice.clone());
                UiEvent::ActivityLogged(notice)
            }
            ServerMessage::Error(payload) => UiEvent::Diagnostic(Diagnostic::ServerError(payload.message)),
            ServerMessage::Info(payload) => UiEvent::Diagnostic(Diagnostic::ServerInfo(payload.message)),
            ServerMessage::GameOver(payload) => {
                let message = payload.message.clone();
                self.game_over = Some(payload);
                UiEvent::ImportantNotice(message)
            }
            ServerMessage::DrawOffer(payload) => {
                self.draw_offer = Some(DrawOffer {
                    offered_by: payload.offered_by,
                    responder: self.game().map(GameState::your_symbol),
                });
                UiEvent::DrawOfferPrompt(payload.message)
            }
        }
    }

    fn apply_snapshot(&mut self, snapshot: GameState) -> UiEvent {
        let game = match mem::replace(&mut self.phase, Phase::Disconnected) {
            Phase::Disconnected => {
                warn!("ignoring game snapshot while disconnected");
                return UiEvent::Diagnostic(Diagnostic::Unexpected { kind: "game_state" });
            }
            Phase::AwaitingFirstSnapshot => snapshot,
            Phase::Active(mut game) | Phase::Concluded(mut game) => {
                if game.game_id() != snapshot.game_id() {
                    info!(game_id = snapshot.game_id(), "new game started");
                    self.game_over = None;
                    self.activity.clear();
                }
                game.replace_with(snapshot);
                game
            }
        };
        self.draw_offer = None;
        let event = UiEvent::StateUpdated(Box::new(game.clone()));
        self.phase = if game.is_finished() {
            info!(game_id = game.game_id(), "game concluded");
            Phase::Concluded(game)
        } else {
            Phase::Active(game)
        };
        event
    }

    pub fn perform(&mut self, command: Command, sender: &impl SendMsg) -> Result<(), ActionError> {
        match command {
            Command::Move(mv) => self.submit_move(mv, sender).map(|_| ()),
            Command::Resign => self.resign(sender),
            Command::OfferDraw => self.offer_draw(sender),
            Command::AcceptDraw => self.accept_draw(sender),
            Command::DeclineDraw => self.decline_draw(sender),
            Command::Status | Command::Help | Command::Board | Command::Quit => {
                self.send(command, sender)
            }
        }
    }

    pub fn submit_move(&mut self, mv: Move, sender: &impl SendMsg) -> Result<ValidMove, ActionError> {
        let valid = match &self.phase {
            Phase::Active(game) | Phase::Concluded(game) => game.validate(mv)?,
            Phase::Disconnected => return Err(ActionError::NotConnected),
            Phase::AwaitingFirstSnapshot => return Err(ActionError::NoActiveGame),
        };
        self.send(Command::Move(valid.get()), sender)?;
        Ok(valid)
    }

    pub fn resign(&mut self, sender: &impl SendMsg) -> Result<(), ActionError> {
        self.require_game_in_progress()?;
        self.send(Command::Resign, sender)
    }

    pub fn offer_draw(&mut self, sender: &impl SendMsg) -> Result<(), ActionError> {
        self.require_game_in_progress()?;
        self.send(Command::OfferDraw, sender)
    }

    pub fn accept_draw(&mut self, sender: &impl SendMsg) -> Result<(), ActionError> {
        self.respond_to_draw(Command::AcceptDraw, sender)
    }

    pub fn decline_draw(&mut self, sender: &impl SendMsg) -> Result<(), ActionError> {
        self.respond_to_draw(Command::DeclineDraw, sender)
    }

    // The offer is cleared before the server confirms so a second response is never sent
    fn respond_to_draw(&mut self, command: Command, sender: &impl SendMsg) -> Result<(), ActionError> {
        if matches!(self.phase, Phase::Disconnected) {
            return Err(ActionError::NotConnected);
        }
        if self.draw_offer.take().is_none() {
            return Err(ActionError::NoDrawOffer);
        }
        self.send(command, sender)
    }

    fn require_game_in_progress(&self) -> Result<(), ActionError> {
        match &self.phase {
            Phase::Active(_) => Ok(()),
            Phase::Disconnected => Err(ActionError::NotConnected),
            Phase::AwaitingFirstSnapshot | Phase::Concluded(_) => Err(ActionError::NoActiveGame),
        }
    }

    fn send(&self, command: Command, sender: &impl SendMsg) -> Result<(), ActionError> {
        if matches!(self.phase, Phase::Disconnected) {
            return Err(ActionError::NotConnected);
        }
        sender.send(&command.to_string())?;
        info!("sent command {}", command);
        Ok(())
    }
}
