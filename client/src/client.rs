use thiserror::Error;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};

#[derive(Error, Debug)]
#[error("Error sending message")]
pub struct SendError;

#[derive(Debug, Clone)]
pub struct Sender(pub mpsc::UnboundedSender<Result<Message, WsError>>);

impl Sender {
    pub fn close(&self) -> Result<(), SendError> {
        self.0.send(Ok(Message::Close(None))).map_err(|_| SendError)
    }
}

pub trait SendMsg {
    fn send(&self, msg: &str) -> Result<(), SendError>;
}

impl SendMsg for Sender {
    fn send(&self, msg: &str) -> Result<(), SendError> {
        self.0.send(Ok(Message::text(msg))).map_err(|_| SendError)
    }
}
