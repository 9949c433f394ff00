use crate::session::ActionError;
use common::messages::DecodeError;
use common::{GameState, Move, Symbol};

#[derive(Clone, Debug, PartialEq)]
pub struct MoveNotice {
    pub player_name: String,
    pub symbol: Symbol,
    pub mv: Move,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Diagnostic {
    ServerError(String),
    ServerInfo(String),
    // The raw text is kept so it can still be shown to the player
    Undecodable { raw: String, error: DecodeError },
    Unexpected { kind: &'static str },
    Rejected(ActionError),
}

// Everything the presentation layer needs to know about, in arrival order
#[derive(Clone, Debug, PartialEq)]
pub enum UiEvent {
    Greeting(String),
    StateUpdated(Box<GameState>),
    ActivityLogged(MoveNotice),
    Diagnostic(Diagnostic),
    ImportantNotice(String),
    DrawOfferPrompt(String),
}

impl From<ActionError> for UiEvent {
    fn from(err: ActionError) -> Self {
        UiEvent::Diagnostic(Diagnostic::Rejected(err))
    }
}
