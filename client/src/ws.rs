use crate::client::Sender;
use crate::config::Config;
use crate::console;
use crate::record::Recorder;
use crate::session::{ActionError, Session};
use anyhow::Context;
use common::messages::Command;
use futures::{FutureExt, Sink, StreamExt};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tracing::{error, info, warn};

const FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

pub async fn run(config: Config) -> anyhow::Result<()> {
    let url = config.connect_url();
    let (ws, _) = connect_async(url.as_str())
        .await
        .with_context(|| format!("failed to connect to {}", url))?;
    info!("connected to {}", url);

    let (ws_sender, mut ws_rcv) = ws.split();
    let (client_sender, client_rcv) = mpsc::unbounded_channel();

    let forwarder = spawn_forwarder(ws_sender, client_rcv);
    let sender = Sender(client_sender);
    let mut session = Session::new();
    session.connected();
    let mut recorder = Recorder::new(config.record_dir.clone());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            msg = ws_rcv.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    for event in session.handle_message(&text) {
                        console::present(&event);
                    }
                    recorder.save(&session);
                }
                Some(Ok(Message::Close(_))) | None => {
                    info!("server closed the connection");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    error!("error receiving ws message: {}", e);
                    break;
                }
            },
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    if user_input(&line, &mut session, &sender) {
                        break;
                    }
                }
                Ok(None) => {
                    info!("stdin closed");
                    close(&sender);
                    break;
                }
                Err(e) => {
                    error!("error reading stdin: {}", e);
                    close(&sender);
                    break;
                }
            },
            _ = signal::ctrl_c() => {
                info!("interrupted");
                close(&sender);
                break;
            }
        }
    }

    session.disconnected();
    shutdown(sender, forwarder).await;
    println!("Disconnected.");
    Ok(())
}

fn spawn_forwarder<S>(
    ws_sender: S,
    client_rcv: mpsc::UnboundedReceiver<Result<Message, WsError>>,
) -> JoinHandle<()>
where
    S: Sink<Message, Error = WsError> + Send + 'static,
{
    let client_rcv = UnboundedReceiverStream::new(client_rcv);
    tokio::task::spawn(client_rcv.forward(ws_sender).map(|result| {
        if let Err(e) = result {
            error!("error sending websocket msg: {}", e);
        }
    }))
}

// Dropping the last sender ends the stream, so the forwarder finishes once every queued frame is written
async fn shutdown(sender: Sender, forwarder: JoinHandle<()>) {
    drop(sender);
    match time::timeout(FLUSH_TIMEOUT, forwarder).await {
        Ok(Ok(())) => info!("outgoing messages flushed"),
        Ok(Err(e)) => error!("websocket forwarder failed: {}", e),
        Err(_) => warn!("timed out flushing outgoing messages"),
    }
}

// Returns true once the player asked to quit
fn user_input(line: &str, session: &mut Session, sender: &Sender) -> bool {
    let command = match line.parse::<Command>() {
        Ok(command) => command,
        Err(err) => {
            warn!("could not parse input {:?}: {}", line, err);
            console::present(&ActionError::from(err).into());
            return false;
        }
    };
    if let Err(err) = session.perform(command, sender) {
        warn!("rejected {}: {}", command, err);
        console::present(&err.into());
    }
    if command == Command::Quit {
        close(sender);
        return true;
    }
    false
}

fn close(sender: &Sender) {
    if let Err(e) = sender.close() {
        error!("error closing connection: {}", e);
    }
}
