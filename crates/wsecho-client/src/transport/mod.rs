//! Transport seam between the session manager and a live socket.
//!
//! A [`Connector`] creates sockets. Each socket is driven elsewhere (a spawned
//! task for the WebSocket transport) and talks to its owner only through
//! channels: [`SocketCommand`]s flow in through a [`SocketHandle`], and
//! [`SocketEvent`]s flow out, tagged with the [`SocketId`] that produced them.

pub mod websocket;

pub use websocket::WsConnector;

use std::fmt;

use tokio::sync::mpsc;

use crate::error::{EchoError, EchoResult};

/// The endpoint the client talks to unless told otherwise.
pub const DEFAULT_ENDPOINT: &str = "ws://127.0.0.1:8008";

/// Identifies one socket for its whole lifetime. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocketId(pub u64);

impl fmt::Display for SocketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Requests from the owner to a socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketCommand {
    /// Transmit a text frame verbatim.
    Send(String),
    /// Start the close handshake.
    Close,
}

/// Lifecycle notifications emitted by a socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketEventKind {
    Open,
    Message(String),
    Close,
    Error(String),
}

/// A lifecycle notification together with the socket it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketEvent {
    pub socket: SocketId,
    pub kind: SocketEventKind,
}

impl SocketEvent {
    pub fn new(socket: SocketId, kind: SocketEventKind) -> Self {
        Self { socket, kind }
    }
}

/// Sender half used by sockets to report lifecycle events.
pub type EventSender = mpsc::UnboundedSender<SocketEvent>;

/// Receiver half the owner drains to learn about socket lifecycle.
pub type EventReceiver = mpsc::UnboundedReceiver<SocketEvent>;

/// Owner-side handle to one socket.
///
/// Dropping the handle without calling [`SocketHandle::close`] also closes
/// the socket once the driver notices the command channel is gone.
#[derive(Debug)]
pub struct SocketHandle {
    id: SocketId,
    commands: mpsc::UnboundedSender<SocketCommand>,
}

impl SocketHandle {
    pub fn new(id: SocketId, commands: mpsc::UnboundedSender<SocketCommand>) -> Self {
        Self { id, commands }
    }

    pub fn id(&self) -> SocketId {
        self.id
    }

    /// Queue a text frame. Returns `false` if the socket driver is gone.
    pub fn send_text(&self, text: &str) -> bool {
        self.commands
            .send(SocketCommand::Send(text.to_string()))
            .is_ok()
    }

    /// Ask the socket to close. Consumes the handle.
    pub fn close(self) {
        if self.commands.send(SocketCommand::Close).is_err() {
            tracing::debug!(socket = %self.id, "close requested on finished socket");
        }
    }
}

/// Creates sockets on behalf of the session manager.
///
/// `connect` must return immediately; the `Open` event (or `Error`) is
/// reported later through `events`.
pub trait Connector {
    fn connect(&mut self, url: &str, id: SocketId, events: EventSender) -> SocketHandle;
}

/// Check that `url` is something the WebSocket transport can dial.
pub fn validate_endpoint(url: &str) -> EchoResult<()> {
    let lower = url.to_lowercase();
    let rest = if let Some(rest) = lower.strip_prefix("ws://") {
        rest
    } else if let Some(rest) = lower.strip_prefix("wss://") {
        rest
    } else {
        return Err(EchoError::InvalidEndpoint(format!(
            "unsupported URL scheme: {url} (expected ws:// or wss://)"
        )));
    };

    let host = rest.split('/').next().unwrap_or(rest);
    if host.is_empty() {
        return Err(EchoError::InvalidEndpoint(format!("missing host in {url}")));
    }
    Ok(())
}

/// Create the event channel a session manager listens on.
pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_websocket_urls() {
        assert!(validate_endpoint(DEFAULT_ENDPOINT).is_ok());
        assert!(validate_endpoint("wss://example.com/echo").is_ok());
        assert!(validate_endpoint("WS://LOCALHOST:9000").is_ok());
    }

    #[test]
    fn reject_other_schemes() {
        assert!(matches!(
            validate_endpoint("http://127.0.0.1:8008"),
            Err(EchoError::InvalidEndpoint(_))
        ));
        assert!(validate_endpoint("127.0.0.1:8008").is_err());
        assert!(validate_endpoint("ftp://example.com").is_err());
    }

    #[test]
    fn reject_missing_host() {
        assert!(validate_endpoint("ws://").is_err());
        assert!(validate_endpoint("wss:///path").is_err());
    }

    #[test]
    fn handle_forwards_commands() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = SocketHandle::new(SocketId(3), tx);
        assert_eq!(handle.id(), SocketId(3));
        assert!(handle.send_text("hi"));
        handle.close();
        assert_eq!(rx.try_recv().unwrap(), SocketCommand::Send("hi".into()));
        assert_eq!(rx.try_recv().unwrap(), SocketCommand::Close);
    }

    #[test]
    fn send_fails_once_driver_is_gone() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let handle = SocketHandle::new(SocketId(1), tx);
        assert!(!handle.send_text("lost"));
    }

    #[test]
    fn socket_id_display() {
        assert_eq!(SocketId(42).to_string(), "#42");
    }
}
