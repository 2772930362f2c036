//! WebSocket transport built on tokio-tungstenite.
//!
//! Each socket is one spawned task. The task dials the endpoint, reports
//! `Open`, then shuttles text frames between the command channel and the
//! WebSocket until the connection ends. After a local close request it keeps
//! draining inbound frames until the close handshake finishes (or
//! [`CLOSE_TIMEOUT`] passes), so late messages still reach the owner.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{self, Message};
use tracing::{debug, info, warn};

use crate::error::EchoError;

use super::{
    Connector, EventSender, SocketCommand, SocketEvent, SocketEventKind, SocketHandle, SocketId,
};

/// How long to wait for the peer to answer our close frame.
pub const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// [`Connector`] that opens real WebSocket connections.
///
/// Must be used from inside a tokio runtime.
#[derive(Debug, Clone, Default)]
pub struct WsConnector;

impl WsConnector {
    pub fn new() -> Self {
        Self
    }
}

impl Connector for WsConnector {
    fn connect(&mut self, url: &str, id: SocketId, events: EventSender) -> SocketHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let url = url.to_string();
        tokio::spawn(async move {
            drive_socket(url, id, rx, events).await;
        });
        SocketHandle::new(id, tx)
    }
}

fn emit(events: &EventSender, id: SocketId, kind: SocketEventKind) {
    if events.send(SocketEvent::new(id, kind)).is_err() {
        debug!(socket = %id, "event receiver dropped");
    }
}

fn emit_error(events: &EventSender, id: SocketId, e: tungstenite::Error) {
    let reason = EchoError::from(e).to_string();
    emit(events, id, SocketEventKind::Error(reason));
}

/// Run one socket from dial to teardown.
async fn drive_socket(
    url: String,
    id: SocketId,
    mut commands: mpsc::UnboundedReceiver<SocketCommand>,
    events: EventSender,
) {
    let ws = match connect_async(url.as_str()).await {
        Ok((ws, _response)) => ws,
        Err(e) => {
            warn!(socket = %id, url = %url, error = %e, "WebSocket connect failed");
            emit_error(&events, id, e);
            return;
        }
    };

    info!(socket = %id, url = %url, "WebSocket connected");
    emit(&events, id, SocketEventKind::Open);

    let (mut sink, mut stream) = ws.split();
    let mut closing = false;
    let close_deadline = tokio::time::sleep(CLOSE_TIMEOUT);
    tokio::pin!(close_deadline);

    loop {
        tokio::select! {
            cmd = commands.recv(), if !closing => match cmd {
                Some(SocketCommand::Send(text)) => {
                    debug!(socket = %id, len = text.len(), "sending text frame");
                    if let Err(e) = sink.send(Message::Text(text)).await {
                        warn!(socket = %id, error = %e, "WebSocket send failed");
                        emit_error(&events, id, e);
                        return;
                    }
                }
                Some(SocketCommand::Close) | None => {
                    debug!(socket = %id, "closing WebSocket");
                    closing = true;
                    close_deadline.as_mut().reset(Instant::now() + CLOSE_TIMEOUT);
                    if let Err(e) = sink.send(Message::Close(None)).await {
                        debug!(socket = %id, error = %e, "close frame not sent");
                        break;
                    }
                }
            },
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    debug!(socket = %id, len = text.len(), "received text frame");
                    emit(&events, id, SocketEventKind::Message(text));
                }
                Some(Ok(Message::Binary(data))) => {
                    debug!(socket = %id, len = data.len(), "dropping binary frame");
                }
                Some(Ok(Message::Close(frame))) => {
                    debug!(socket = %id, ?frame, "WebSocket close frame received");
                }
                Some(Ok(_)) => {} // ping, pong, raw frames
                Some(Err(e)) => {
                    if closing {
                        debug!(socket = %id, error = %e, "read error during close");
                        break;
                    }
                    warn!(socket = %id, error = %e, "WebSocket read error");
                    emit_error(&events, id, e);
                    return;
                }
                None => break,
            },
            () = &mut close_deadline, if closing => {
                warn!(socket = %id, "peer did not finish close handshake");
                break;
            }
        }
    }

    info!(socket = %id, "WebSocket closed");
    emit(&events, id, SocketEventKind::Close);
}
