//! Connection session manager.
//!
//! A `SessionManager` owns at most one socket, the connection state, the
//! transcript and the pending input buffer. It never blocks: sockets are
//! created through a [`Connector`] and report back through [`SocketEvent`]s,
//! which the owner feeds into [`SessionManager::handle_event`] from a single
//! event loop.

use tracing::{debug, info, warn};

use crate::transcript::{Transcript, TranscriptEntry};
use crate::transport::{
    event_channel, Connector, EventReceiver, EventSender, SocketEvent, SocketEventKind,
    SocketHandle, SocketId,
};

/// Whether the held socket is usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
}

/// Finer-grained view used for display: `Connecting` is a held socket whose
/// open event has not fired yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Disconnected,
    Connecting,
    Connected,
}

pub struct SessionManager<C> {
    connector: C,
    endpoint: String,
    events: EventSender,
    socket: Option<SocketHandle>,
    state: ConnectionState,
    transcript: Transcript,
    input: String,
    next_socket_id: u64,
}

impl<C: Connector> SessionManager<C> {
    /// Create a manager for `endpoint`. The returned receiver yields the
    /// lifecycle events of every socket this manager creates.
    pub fn new(connector: C, endpoint: impl Into<String>) -> (Self, EventReceiver) {
        let (events, rx) = event_channel();
        let manager = Self {
            connector,
            endpoint: endpoint.into(),
            events,
            socket: None,
            state: ConnectionState::Disconnected,
            transcript: Transcript::new(),
            input: String::new(),
            next_socket_id: 1,
        };
        (manager, rx)
    }

    /// URL every new socket dials.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Current connection state. Stays `Disconnected` while connecting.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        match (self.state, &self.socket) {
            (ConnectionState::Connected, _) => Phase::Connected,
            (ConnectionState::Disconnected, Some(_)) => Phase::Connecting,
            (ConnectionState::Disconnected, None) => Phase::Disconnected,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// Id of the held socket, if any.
    pub fn socket_id(&self) -> Option<SocketId> {
        self.socket.as_ref().map(SocketHandle::id)
    }

    /// Everything sent and received so far.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// The pending, not yet sent, input.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replace the pending input.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Append one character to the pending input.
    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
    }

    /// Remove the last character of the pending input.
    pub fn pop_char(&mut self) -> Option<char> {
        self.input.pop()
    }

    /// Disconnect if a socket is held, otherwise start connecting.
    ///
    /// Disconnecting is optimistic: state drops to `Disconnected` and the
    /// handle is released before the close handshake completes. Connecting
    /// leaves state `Disconnected` until the socket reports `Open`.
    pub fn toggle_connection(&mut self) {
        if let Some(handle) = self.socket.take() {
            info!(socket = %handle.id(), "disconnect requested");
            handle.close();
            self.state = ConnectionState::Disconnected;
            return;
        }

        let id = SocketId(self.next_socket_id);
        self.next_socket_id += 1;
        info!(socket = %id, endpoint = %self.endpoint, "connecting");
        let handle = self.connector.connect(&self.endpoint, id, self.events.clone());
        self.socket = Some(handle);
    }

    /// Send `text` over the connected socket.
    ///
    /// Silently does nothing (returns `false`) when not connected or when
    /// `text` is empty. On success a `Sent` entry is appended and the pending
    /// input is cleared.
    pub fn send(&mut self, text: &str) -> bool {
        if text.is_empty() || self.state != ConnectionState::Connected {
            return false;
        }
        let Some(handle) = self.socket.as_ref() else {
            return false;
        };
        if !handle.send_text(text) {
            warn!(socket = %handle.id(), "socket driver gone, message dropped");
            return false;
        }
        self.transcript.push(TranscriptEntry::sent(text));
        self.input.clear();
        true
    }

    /// Send the pending input.
    pub fn submit(&mut self) -> bool {
        let text = std::mem::take(&mut self.input);
        let sent = self.send(&text);
        if !sent {
            self.input = text;
        }
        sent
    }

    /// Apply one socket lifecycle event.
    ///
    /// Messages are recorded whichever socket delivered them. `Open`, `Close`
    /// and `Error` only affect the held socket; events from an abandoned socket
    /// are ignored.
    pub fn handle_event(&mut self, event: SocketEvent) {
        let SocketEvent { socket, kind } = event;
        let held = self.socket_id() == Some(socket);
        match kind {
            SocketEventKind::Message(text) => {
                debug!(socket = %socket, len = text.len(), "message received");
                self.transcript.push(TranscriptEntry::received(text));
            }
            kind if !held => {
                debug!(socket = %socket, ?kind, "ignoring event from stale socket");
            }
            SocketEventKind::Open => {
                info!(socket = %socket, "connected");
                self.state = ConnectionState::Connected;
            }
            SocketEventKind::Close => {
                info!(socket = %socket, "disconnected");
                self.release();
            }
            SocketEventKind::Error(reason) => {
                warn!(socket = %socket, error = %reason, "socket error");
                self.release();
            }
        }
    }

    /// Close any held socket. Used when the user quits.
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.socket.take() {
            debug!(socket = %handle.id(), "closing socket on shutdown");
            handle.close();
        }
        self.state = ConnectionState::Disconnected;
    }

    fn release(&mut self) {
        self.socket = None;
        self.state = ConnectionState::Disconnected;
    }
}
