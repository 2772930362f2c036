//! wsecho-client: single-socket WebSocket text session.
//!
//! Holds at most one WebSocket connection, forwards user text over it, and
//! keeps an append-only transcript of everything sent and received.
//!
//! # Quick Start
//!
//! ```no_run
//! use wsecho_client::{SessionManager, WsConnector, DEFAULT_ENDPOINT};
//!
//! # async fn example() {
//! let (mut session, mut events) = SessionManager::new(WsConnector::new(), DEFAULT_ENDPOINT);
//! session.toggle_connection();
//!
//! while let Some(event) = events.recv().await {
//!     session.handle_event(event);
//!     if session.is_connected() && session.transcript().is_empty() {
//!         session.send("ping");
//!     }
//!     if session.transcript().len() == 2 {
//!         session.toggle_connection();
//!         break;
//!     }
//! }
//!
//! for entry in session.transcript() {
//!     println!("{entry}");
//! }
//! # }
//! ```

pub mod error;
pub mod session;
pub mod transcript;
pub mod transport;

pub use error::{EchoError, EchoResult};
pub use session::{ConnectionState, Phase, SessionManager};
pub use transcript::{Direction, Transcript, TranscriptEntry};
pub use transport::{
    validate_endpoint, Connector, EventReceiver, SocketEvent, SocketEventKind, SocketHandle,
    SocketId, WsConnector, DEFAULT_ENDPOINT,
};
